//! Identifier checks and case conversion for generated names.
use heck::{ToSnakeCase, ToUpperCamelCase};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENT_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex")
});

/// Strict and reserved keywords of the 2024 edition. `union` is contextual and allowed.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
    "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
    "do", "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

pub fn is_identifier(s: &str) -> bool {
    s != "_" && IDENT_RX.is_match(s)
}

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// `json_value` → `JsonValue`
pub fn type_name(s: &str) -> String {
    s.to_upper_camel_case()
}

/// `BoolValue` → `bool_value`
pub fn method_stem(s: &str) -> String {
    s.to_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("bool_value"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("X1"));
        assert!(!is_identifier("_"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("has-dash"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("naïve"));
    }

    #[test]
    fn keywords_include_edition_2024_reservations() {
        assert!(is_keyword("type"));
        assert!(is_keyword("gen"));
        assert!(!is_keyword("union"));
        assert!(!is_keyword("value"));
    }

    #[test]
    fn case_conversion() {
        assert_eq!(type_name("json_value"), "JsonValue");
        assert_eq!(type_name("JsonValue"), "JsonValue");
        assert_eq!(method_stem("NumberValue"), "number_value");
        assert_eq!(method_stem("number_value"), "number_value");
    }
}
