//! Page lifecycle events and terminal input mapping.

use shared::protocol::Notice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    OverlayDetached,
    ButtonReverted,
    CardHidden,
    Notice(Notice),
}

/// Maps a line typed on stdin to the key name the intro understands.
pub fn key_for_input(line: &str) -> Option<&'static str> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Some("Enter"),
        "esc" | "escape" | "q" | "skip" => Some("Escape"),
        _ => None,
    }
}

/// Parses `name=value` form field arguments.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(format!("expected name=value, got '{raw}'"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("field name missing in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_enter_and_escape_words() {
        assert_eq!(key_for_input(""), Some("Enter"));
        assert_eq!(key_for_input("  \n"), Some("Enter"));
        assert_eq!(key_for_input("ESC"), Some("Escape"));
        assert_eq!(key_for_input("skip"), Some("Escape"));
        assert_eq!(key_for_input("hello"), None);
    }

    #[test]
    fn parses_fields_keeping_value_verbatim() {
        assert_eq!(
            parse_field("message=a=b c"),
            Ok(("message".to_string(), "a=b c".to_string()))
        );
        assert!(parse_field("no-separator").is_err());
        assert!(parse_field("=value").is_err());
    }
}
