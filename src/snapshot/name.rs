//! Syntactic rules for snapshot names.
//!
//! Lengths and positions count Unicode scalar values (`char`s). Uniqueness is
//! not checked here; `Manager::validate_name` adds it on top of `check_syntax`.

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::error::{Result, SnapshotError};

/// Maximum accepted name length.
pub const MAX_NAME_LENGTH: usize = 250;

/// Names longer than this are truncated when echoed in error messages.
pub const NAME_DISPLAY_CUTOFF: usize = 30;

const ELLIPSIS: char = '…';

/// Check every rule except uniqueness.
pub fn check_syntax(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SnapshotError::EmptyName);
    }

    let len = name.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(SnapshotError::NameTooLong {
            shown: display_head(name),
            max: MAX_NAME_LENGTH,
            len,
        });
    }

    check_printable(name)?;

    // non-empty: checked above
    let first = name.chars().next().unwrap_or(' ');
    if first.is_whitespace() {
        return Err(SnapshotError::LeadingWhitespace {
            shown: display_head(name),
        });
    }
    let last = name.chars().next_back().unwrap_or(' ');
    if last.is_whitespace() {
        return Err(SnapshotError::TrailingWhitespace {
            shown: display_tail(name),
        });
    }
    Ok(())
}

fn check_printable(name: &str) -> Result<()> {
    for (position, c) in name.chars().enumerate() {
        if !is_printable(c) {
            return Err(SnapshotError::InvalidCharacter {
                value: c as u32,
                position,
            });
        }
    }
    Ok(())
}

/// Printable means a letter, mark, number, punctuation or symbol, plus the
/// ASCII space. Controls, format characters, surrogates, private-use and
/// unassigned code points (noncharacters included) and every other separator
/// are rejected.
pub fn is_printable(c: char) -> bool {
    use GeneralCategory::*;

    if c == ' ' {
        return true;
    }
    matches!(
        get_general_category(c),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | NonspacingMark
            | SpacingMark
            | EnclosingMark
            | DecimalNumber
            | LetterNumber
            | OtherNumber
            | ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
    )
}

/// First `NAME_DISPLAY_CUTOFF` chars followed by an ellipsis when longer.
pub fn display_head(name: &str) -> String {
    if name.chars().count() <= NAME_DISPLAY_CUTOFF {
        return name.to_string();
    }
    let mut s: String = name.chars().take(NAME_DISPLAY_CUTOFF).collect();
    s.push(ELLIPSIS);
    s
}

/// Ellipsis followed by the last `NAME_DISPLAY_CUTOFF` chars when longer.
pub fn display_tail(name: &str) -> String {
    let len = name.chars().count();
    if len <= NAME_DISPLAY_CUTOFF {
        return name.to_string();
    }
    let mut s = String::with_capacity(name.len());
    s.push(ELLIPSIS);
    s.extend(name.chars().skip(len - NAME_DISPLAY_CUTOFF));
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for n in ["before-upgrade", "a", "with inner spaces", "日本語の名前", "x".repeat(250).as_str()] {
            check_syntax(n).unwrap_or_else(|e| panic!("{n:?} rejected: {e}"));
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(check_syntax(""), Err(SnapshotError::EmptyName)));
    }

    #[test]
    fn too_long_reports_full_length_and_head() {
        let name = format!("{}{}", "a".repeat(30), "b".repeat(221));
        match check_syntax(&name) {
            Err(SnapshotError::NameTooLong { shown, max, len }) => {
                assert_eq!(max, 250);
                assert_eq!(len, 251);
                assert_eq!(shown, format!("{}…", "a".repeat(30)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn control_character_reports_value_and_index() {
        match check_syntax("ab\u{7}c") {
            Err(SnapshotError::InvalidCharacter { value, position }) => {
                assert_eq!(value, 7);
                assert_eq!(position, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            check_syntax("tab\there"),
            Err(SnapshotError::InvalidCharacter { value: 9, position: 3 })
        ));
        assert!(matches!(
            check_syntax("zero\u{200B}width"),
            Err(SnapshotError::InvalidCharacter { value: 0x200B, .. })
        ));
    }

    #[test]
    fn private_use_unassigned_and_noncharacters_are_rejected() {
        for c in ['\u{E000}', '\u{0378}', '\u{FFFE}', '\u{F0000}', '\u{2028}', '\u{00A0}'] {
            let name = format!("a{c}b");
            match check_syntax(&name) {
                Err(SnapshotError::InvalidCharacter { value, position }) => {
                    assert_eq!(value, c as u32);
                    assert_eq!(position, 1);
                }
                other => panic!("U+{:04X} accepted: {other:?}", c as u32),
            }
        }
    }

    #[test]
    fn symbols_marks_and_punctuation_are_printable() {
        for c in ['€', '©', '+', '_', '«', 'é', '\u{0301}', 'Ⅻ', '٣'] {
            assert!(is_printable(c), "U+{:04X}", c as u32);
        }
    }

    #[test]
    fn leading_and_trailing_space() {
        assert!(matches!(
            check_syntax(" lead"),
            Err(SnapshotError::LeadingWhitespace { .. })
        ));
        assert!(matches!(
            check_syntax("trail "),
            Err(SnapshotError::TrailingWhitespace { .. })
        ));
    }

    #[test]
    fn trailing_space_shows_tail_of_long_name() {
        let name = format!("{}{} ", "h".repeat(40), "t".repeat(29));
        match check_syntax(&name) {
            Err(SnapshotError::TrailingWhitespace { shown }) => {
                assert_eq!(shown, format!("…{} ", "t".repeat(29)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn display_helpers_leave_short_names_alone() {
        assert_eq!(display_head("short"), "short");
        assert_eq!(display_tail("short"), "short");
    }
}
