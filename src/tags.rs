//! Free-text tag string parsing and slug derivation.
//!
//! Tag strings arrive from post forms using `;` or `,` as separators, with
//! arbitrary whitespace around tokens. Blank input is valid and yields no
//! tags.

/// Split a raw tag string into cleaned tag names.
///
/// Commas are normalized to semicolons before splitting, so mixed
/// separators behave like a single kind. Tokens are trimmed, blanks are
/// dropped, and duplicates keep their first occurrence.
pub fn parse_tag_names(raw: &str) -> Vec<String> {
    let normalized = raw.replace(',', ";");

    let mut names: Vec<String> = Vec::new();
    for token in normalized.split(';') {
        let name = token.trim();
        if name.is_empty() {
            continue;
        }
        if names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Derive a URL slug from a tag name, preserving non-ASCII letters.
///
/// Unicode alphanumerics are kept (lowercased); runs of whitespace,
/// hyphens, and underscores collapse to a single `-`; everything else is
/// dropped. Leading and trailing separators are trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_sep = true;
        }
        // Punctuation and symbols disappear without forcing a separator
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_separated_names() {
        assert_eq!(parse_tag_names("go; rust"), vec!["go", "rust"]);
    }

    #[test]
    fn mixed_separators_match_normalized_form() {
        let mixed = parse_tag_names("go, rust; web,api");
        let uniform = parse_tag_names("go; rust; web; api");
        assert_eq!(mixed, uniform);
    }

    #[test]
    fn trims_and_drops_blank_tokens() {
        assert_eq!(parse_tag_names("  go ;; , rust  ,"), vec!["go", "rust"]);
        assert_eq!(parse_tag_names("   "), Vec::<String>::new());
        assert_eq!(parse_tag_names(""), Vec::<String>::new());
    }

    #[test]
    fn deduplicates_keeping_first_occurrence() {
        assert_eq!(parse_tag_names("go; rust,  go"), vec!["go", "rust"]);
    }

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
    }

    #[test]
    fn slugify_preserves_non_ascii() {
        assert_eq!(slugify("파이썬 공부"), "파이썬-공부");
        assert_eq!(slugify("Café au lait"), "café-au-lait");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("c++ (the good parts)!"), "c-the-good-parts");
        assert_eq!(slugify("...!!!"), "");
    }
}
