//! Environment variable parsing with warn-level logging for invalid values.

/// Parse a looked-up environment value with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// Non-empty string value, or `default` when unset or blank.
pub fn string_or_default(raw: Option<&str>, default: &str) -> String {
    raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_value() {
        let result: u32 = parse_with_default("TEST_VAR", Some("42"), 10);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let result: u16 = parse_with_default("TEST_VAR", Some(" 6543 "), 5432);
        assert_eq!(result, 6543);
    }

    #[test]
    fn test_parse_invalid_value() {
        let result: u32 = parse_with_default("TEST_VAR", Some("banana"), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_missing_var() {
        let result: u32 = parse_with_default("TEST_VAR", None, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_empty_value() {
        let result: u32 = parse_with_default("TEST_VAR", Some(""), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_string_or_default() {
        assert_eq!(string_or_default(None, "localhost"), "localhost");
        assert_eq!(string_or_default(Some("   "), "localhost"), "localhost");
        assert_eq!(string_or_default(Some(" db.internal "), "localhost"), "db.internal");
    }
}
