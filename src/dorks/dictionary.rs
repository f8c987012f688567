//! The dork template dictionary
//!
//! Loaded once from `dorks.json`:
//!
//! ```json
//! {
//!   "social": ["https://www.google.com/search?q=site:twitter.com+{query_q}"],
//!   "files": ["https://www.google.com/search?q={query_q}+filetype:pdf"],
//!   "priority_order": ["social", "files"]
//! }
//! ```
//!
//! When `priority_order` is present and non-empty it is the complete list of
//! categories to produce; a category missing from it is never rendered or
//! exported.

use crate::locale::LocaleBundle;
use crate::query::{EncodedQuery, expand_templates};
use crate::source::{DORKS_DOCUMENT, DataSource};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Reserved key holding the category order
pub const PRIORITY_ORDER_KEY: &str = "priority_order";

/// One category's expanded URLs, ready to display or export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderUnit {
    /// Category key in the dictionary
    pub category: String,
    /// Localized display label
    pub label: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDictionary {
    /// Categories in document order
    categories: IndexMap<String, Vec<String>>,
    priority_order: Vec<String>,
}

impl TemplateDictionary {
    /// Build from a parsed `dorks.json` document. Anything other than an
    /// object yields an empty dictionary.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            warn!("dork dictionary is not an object, ignoring it");
            return Self::default();
        };

        let mut dictionary = Self::default();
        for (key, value) in map {
            if key == PRIORITY_ORDER_KEY {
                dictionary.priority_order = string_entries(&key, value);
            } else {
                let templates = string_entries(&key, value);
                dictionary.categories.insert(key, templates);
            }
        }
        dictionary
    }

    /// Load `dorks.json` from a source. Any failure leaves the dictionary empty.
    pub async fn load(source: &dyn DataSource) -> Self {
        match source.fetch(DORKS_DOCUMENT).await {
            Ok(value) => {
                let dictionary = Self::from_value(value);
                debug!(
                    categories = dictionary.categories.len(),
                    templates = dictionary.template_count(),
                    "dork dictionary loaded"
                );
                dictionary
            }
            Err(e) => {
                warn!(error = %e, "dork dictionary unavailable");
                Self::default()
            }
        }
    }

    /// Categories to iterate, in order.
    ///
    /// `priority_order` when it is non-empty, otherwise the document's key
    /// order. The reserved key itself is never returned.
    pub fn ordered_categories(&self) -> Vec<&str> {
        if self.priority_order.is_empty() {
            self.categories.keys().map(String::as_str).collect()
        } else {
            self.priority_order
                .iter()
                .map(String::as_str)
                .filter(|name| *name != PRIORITY_ORDER_KEY)
                .collect()
        }
    }

    /// Every category in document order, whether produced or not
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Templates for a category, empty when absent
    pub fn templates_for(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when the document defined no categories
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn template_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Expand every produced category against a query.
    ///
    /// Categories come in [`ordered_categories`](Self::ordered_categories)
    /// order and those without templates are skipped. URLs keep template
    /// order.
    pub fn render_units<'a>(
        &'a self,
        query: &'a EncodedQuery,
        locale: &'a LocaleBundle,
    ) -> impl Iterator<Item = RenderUnit> + 'a {
        self.ordered_categories()
            .into_iter()
            .filter_map(move |category| {
                let templates = self.templates_for(category);
                if templates.is_empty() {
                    return None;
                }
                Some(RenderUnit {
                    category: category.to_string(),
                    label: locale.section_label(category),
                    urls: expand_templates(templates, query),
                })
            })
    }
}

/// String items of a JSON array; non-strings and non-arrays are dropped
fn string_entries(key: &str, value: Value) -> Vec<String> {
    let Value::Array(items) = value else {
        warn!(key, "expected an array, ignoring");
        return Vec::new();
    };

    let total = items.len();
    let entries: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect();

    if entries.len() != total {
        warn!(key, dropped = total - entries.len(), "dropped non-string entries");
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn units(dictionary: &TemplateDictionary, raw: &str) -> Vec<RenderUnit> {
        let query = EncodedQuery::new(raw);
        let locale = LocaleBundle::default();
        dictionary.render_units(&query, &locale).collect()
    }

    #[test]
    fn test_natural_key_order() {
        let d = TemplateDictionary::from_value(json!({
            "zeta": ["z"],
            "alpha": ["a"],
            "mid": ["m"]
        }));
        assert_eq!(d.ordered_categories(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_priority_order_wins() {
        let d = TemplateDictionary::from_value(json!({
            "a": ["1"],
            "b": ["2"],
            "priority_order": ["b", "a"]
        }));
        assert_eq!(d.ordered_categories(), vec!["b", "a"]);
    }

    #[test]
    fn test_priority_order_excludes_unlisted_categories() {
        let d = TemplateDictionary::from_value(json!({
            "x": ["https://x.example/{query}"],
            "y": ["https://y.example/{query}"],
            "priority_order": ["x"]
        }));
        let produced = units(&d, "alice");
        assert_eq!(produced.len(), 1);
        assert_eq!(produced[0].category, "x");
        assert!(produced.iter().all(|u| u.category != "y"));
    }

    #[test]
    fn test_empty_priority_order_uses_natural_order() {
        let d = TemplateDictionary::from_value(json!({
            "priority_order": [],
            "a": ["1"],
            "b": ["2"]
        }));
        assert_eq!(d.ordered_categories(), vec!["a", "b"]);
    }

    #[test]
    fn test_reserved_key_is_never_a_category() {
        let d = TemplateDictionary::from_value(json!({
            "a": ["1"],
            "priority_order": ["priority_order", "a"]
        }));
        assert_eq!(d.ordered_categories(), vec!["a"]);
        assert_eq!(d.category_count(), 1);
    }

    #[test]
    fn test_empty_and_missing_categories_are_skipped() {
        let d = TemplateDictionary::from_value(json!({
            "empty": [],
            "full": ["f/{query}"],
            "priority_order": ["empty", "ghost", "full"]
        }));
        let produced = units(&d, "q");
        assert_eq!(produced.len(), 1);
        assert_eq!(produced[0].urls, vec!["f/q"]);
    }

    #[test]
    fn test_templates_for() {
        let d = TemplateDictionary::from_value(json!({
            "a": ["1", 2, "3", null],
            "b": "not an array"
        }));
        assert_eq!(d.templates_for("a"), ["1".to_string(), "3".to_string()]);
        assert!(d.templates_for("b").is_empty());
        assert!(d.templates_for("missing").is_empty());
        assert_eq!(d.template_count(), 2);
    }

    #[test]
    fn test_non_object_document_is_empty() {
        assert!(TemplateDictionary::from_value(json!([1, 2])).is_empty());
        assert!(TemplateDictionary::from_value(json!(null)).is_empty());
    }

    #[test]
    fn test_priority_order_only_is_empty() {
        let d = TemplateDictionary::from_value(json!({"priority_order": ["a"]}));
        assert!(d.is_empty());
        assert!(units(&d, "q").is_empty());
    }

    #[test]
    fn test_labels_come_from_locale() {
        let d = TemplateDictionary::from_value(json!({
            "social": ["s/{query}"],
            "files": ["f/{query}"]
        }));
        let locale = LocaleBundle::from_value(json!({"sections": {"social": "Sosyal"}})).unwrap();
        let query = EncodedQuery::new("q");
        let labels: Vec<String> = d.render_units(&query, &locale).map(|u| u.label).collect();
        assert_eq!(labels, vec!["Sosyal", "FILES"]);
    }

    #[tokio::test]
    async fn test_load_failure_is_empty() {
        let source = crate::source::MemorySource::new();
        assert!(TemplateDictionary::load(&source).await.is_empty());
    }
}
