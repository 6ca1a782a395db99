//! Player name validation and log-safe rendering of user input.

/// Longest accepted player name, in characters.
pub const MAX_NAME_CHARS: usize = 24;

/// Cap on how much of a user string is copied into a single log line.
const LOG_PREVIEW_CHARS: usize = 120;

/// Player name validation errors with helpful messages
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Please enter a name.")]
    Empty,

    #[error("That name is too long (maximum {max} characters).")]
    TooLong { max: usize },

    #[error("Names may not contain control characters.")]
    ControlCharacters,
}

/// Validate and normalize a player name.
///
/// Surrounding whitespace is trimmed and inner runs of whitespace collapse to a
/// single space, so the leaderboard never shows ragged names.
pub fn validate_player_name(raw: &str) -> Result<String, NameError> {
    if raw.chars().any(|c| c.is_control() && c != '\t') {
        return Err(NameError::ControlCharacters);
    }
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(NameError::TooLong {
            max: MAX_NAME_CHARS,
        });
    }
    Ok(name)
}

/// Render user input so it fits on one log line: control characters become
/// escapes and long input is cut with an ellipsis.
pub fn escape_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(LOG_PREVIEW_CHARS) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= LOG_PREVIEW_CHARS {
            out.push('…');
            break;
        }
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_trimmed_and_collapsed() {
        assert_eq!(validate_player_name("  Ada   Lovelace ").unwrap(), "Ada Lovelace");
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_player_name("   "), Err(NameError::Empty));
        assert_eq!(
            validate_player_name(&"x".repeat(MAX_NAME_CHARS + 1)),
            Err(NameError::TooLong {
                max: MAX_NAME_CHARS
            })
        );
        assert_eq!(
            validate_player_name("bad\u{7}bell"),
            Err(NameError::ControlCharacters)
        );
        assert!(validate_player_name(&"y".repeat(MAX_NAME_CHARS)).is_ok());
    }

    #[test]
    fn test_escape_for_log() {
        assert_eq!(escape_for_log("go\nnorth\t"), "go\\nnorth\\t");
        let long = "a".repeat(LOG_PREVIEW_CHARS + 10);
        let esc = escape_for_log(&long);
        assert!(esc.ends_with('…'));
        assert_eq!(esc.chars().count(), LOG_PREVIEW_CHARS + 1);
    }
}
