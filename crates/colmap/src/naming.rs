//! Default column names derived from field identifiers.

use std::sync::OnceLock;

use regex::Regex;

/// A capitalized word (`Bar` in `FOOBar`) preceded by anything.
fn word_boundary() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("invalid built-in word regex"))
}

/// A lowercase letter or digit directly followed by an uppercase letter.
fn acronym_boundary() -> &'static Regex {
    static ACRONYM_RE: OnceLock<Regex> = OnceLock::new();
    ACRONYM_RE
        .get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("invalid built-in acronym regex"))
}

/// Convert an identifier to the lowercase, underscore-separated column name.
///
/// Runs of capitals are kept together as one word, so `HelloRPCWorld` becomes
/// `hello_rpc_world` and `FOOBarBAZ` becomes `foo_bar_baz`. Identifiers that
/// are already snake_case come back unchanged.
pub fn snake_case(ident: &str) -> String {
    const SPLIT: &str = "${1}_${2}";
    let words = word_boundary().replace_all(ident, SPLIT);
    acronym_boundary().replace_all(&words, SPLIT).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_camel_case() {
        let cases = [
            ("A", "a"),
            ("Lollipop", "lollipop"),
            ("HelloWorld", "hello_world"),
            ("ChocolateID", "chocolate_id"),
            ("FOOBarBAZ", "foo_bar_baz"),
            ("ChimpanzeeRPCWorld", "chimpanzee_rpc_world"),
            ("IDNumber", "id_number"),
            ("Field2Name", "field2_name"),
            ("HTTP", "http"),
        ];
        for (input, want) in cases {
            assert_eq!(snake_case(input), want, "input {input}");
        }
    }

    #[test]
    fn leaves_snake_case_alone() {
        for ident in ["platypus", "chocolate_id", "a", "x1_y2"] {
            assert_eq!(snake_case(ident), ident);
        }
    }

    #[test]
    fn is_idempotent() {
        for ident in ["ChimpanzeeRPCWorld", "FOOBarBAZ", "HelloWorld", "ABC"] {
            let once = snake_case(ident);
            assert_eq!(snake_case(&once), once);
        }
    }

    #[test]
    fn never_adds_edge_underscores() {
        for ident in ["Abc", "ABc", "AbC", "ABC", "aB"] {
            let out = snake_case(ident);
            assert!(!out.starts_with('_') && !out.ends_with('_'), "{ident} -> {out}");
        }
    }
}
