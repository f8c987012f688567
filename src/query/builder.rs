//! Template expansion
//!
//! Templates reference the encoded query through four placeholder tokens:
//!
//! | Token             | Replaced with                  |
//! |-------------------|--------------------------------|
//! | `{query}`         | [`EncodedQuery::encoded`]      |
//! | `{query_nospace}` | [`EncodedQuery::nospace`]      |
//! | `{query_plus}`    | [`EncodedQuery::plus`]         |
//! | `{query_q}`       | [`EncodedQuery::quoted`]       |
//!
//! All tokens are replaced in one scan of the template. Substituted text is
//! never scanned again, so a query that itself contains `{query}` is copied
//! through literally. Any other brace token is left untouched.

use super::encoder::EncodedQuery;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(query|query_nospace|query_plus|query_q)\}").expect("static placeholder pattern")
});

/// Expand a single template against an encoded query
pub fn build_url(template: &str, query: &EncodedQuery) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "query" => query.encoded.clone(),
            "query_nospace" => query.nospace.clone(),
            "query_plus" => query.plus.clone(),
            "query_q" => query.quoted.clone(),
            other => format!("{{{}}}", other),
        })
        .into_owned()
}

/// Expand templates in order
pub fn expand_templates(templates: &[String], query: &EncodedQuery) -> Vec<String> {
    templates.iter().map(|t| build_url(t, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &str = "x?a={query}&b={query_nospace}&c={query_plus}&d={query_q}";

    #[test]
    fn test_all_placeholders() {
        let q = EncodedQuery::new("john doe");
        assert_eq!(
            build_url(ALL, &q),
            "x?a=john%20doe&b=johndoe&c=john+doe&d=%22john%20doe%22"
        );
    }

    #[test]
    fn test_no_brace_tokens_remain() {
        for raw in ["alice", "a b c", "{query}", "x}{y", "ünïcödé", "a/b?c"] {
            let url = build_url(ALL, &EncodedQuery::new(raw));
            for token in ["{query}", "{query_nospace}", "{query_plus}", "{query_q}"] {
                assert!(!url.contains(token), "{} left in {}", token, url);
            }
        }
    }

    #[test]
    fn test_repeated_placeholders() {
        let q = EncodedQuery::new("bob");
        assert_eq!(build_url("{query}-{query}-{query_q}", &q), "bob-bob-%22bob%22");
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let q = EncodedQuery::new("bob");
        assert_eq!(
            build_url("{QUERY}/{query_x}/{ query }/{query}", &q),
            "{QUERY}/{query_x}/{ query }/bob"
        );
    }

    #[test]
    fn test_substitution_is_not_rescanned() {
        // nospace keeps braces unencoded, so the substituted value contains a token
        let q = EncodedQuery::new("{query}");
        assert_eq!(build_url("{query_nospace}", &q), "{query}");
        assert_eq!(build_url("{query}", &q), "%7Bquery%7D");
    }

    #[test]
    fn test_template_without_placeholders() {
        let q = EncodedQuery::new("bob");
        assert_eq!(build_url("https://example.com/", &q), "https://example.com/");
    }

    #[test]
    fn test_expand_preserves_order() {
        let q = EncodedQuery::new("a");
        let templates = vec!["1/{query}".to_string(), "2/{query}".to_string(), "3".to_string()];
        assert_eq!(expand_templates(&templates, &q), vec!["1/a", "2/a", "3"]);
    }
}
