//! Locale bundles
//!
//! A bundle is the parsed form of one `locales/<code>.json` document. Every
//! key is optional in the document: a missing, empty or non-string value
//! reads as the built-in fallback text for that key, so lookups never fail.
//! A `sections` value that is not an object reads as no section labels.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::warn;

/// Tag carried by the fallback resolution
pub const FALLBACK_LANG: &str = "fallback";

/// A localized UI string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    Title,
    Subtitle,
    Description,
    SearchBtn,
    SearchPlaceholder,
    ExportPdf,
    ResultsNone,
    ResultsFound,
    ResultsProcessing,
    ConsoleSending,
    ConsoleWarnNoInput,
    ConsoleDorksMissing,
    ConsoleDone,
}

impl Text {
    pub const ALL: [Text; 13] = [
        Text::Title,
        Text::Subtitle,
        Text::Description,
        Text::SearchBtn,
        Text::SearchPlaceholder,
        Text::ExportPdf,
        Text::ResultsNone,
        Text::ResultsFound,
        Text::ResultsProcessing,
        Text::ConsoleSending,
        Text::ConsoleWarnNoInput,
        Text::ConsoleDorksMissing,
        Text::ConsoleDone,
    ];

    /// Key used in locale documents
    pub const fn key(self) -> &'static str {
        match self {
            Text::Title => "title",
            Text::Subtitle => "subtitle",
            Text::Description => "description",
            Text::SearchBtn => "searchBtn",
            Text::SearchPlaceholder => "searchPlaceholder",
            Text::ExportPdf => "controls_export_pdf",
            Text::ResultsNone => "results_none",
            Text::ResultsFound => "results_found",
            Text::ResultsProcessing => "results_processing",
            Text::ConsoleSending => "console_sending",
            Text::ConsoleWarnNoInput => "console_warn_no_input",
            Text::ConsoleDorksMissing => "console_dorks_missing",
            Text::ConsoleDone => "console_done",
        }
    }

    /// Built-in text used when no locale provides the key
    pub const fn fallback(self) -> &'static str {
        match self {
            Text::Title => "Krasnyy Laboratoriya",
            Text::Subtitle => "Open Source Intelligence Tool",
            Text::Description => "Locale files missing.",
            Text::SearchBtn => "Search",
            Text::SearchPlaceholder => "enter target or username...",
            Text::ExportPdf => "Export as PDF",
            Text::ResultsNone => "Henüz sonuç yok",
            Text::ResultsFound => "results found",
            Text::ResultsProcessing => "Processing...",
            Text::ConsoleSending => ">> Starting dork analysis: ",
            Text::ConsoleWarnNoInput => "⚠ Please enter a target!",
            Text::ConsoleDorksMissing => "Dork list missing.",
            Text::ConsoleDone => "✔ Done.",
        }
    }
}

/// Localized strings for one language
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocaleBundle {
    /// Category key -> display label
    #[serde(default, deserialize_with = "lenient_sections")]
    sections: IndexMap<String, Value>,
    #[serde(flatten)]
    strings: HashMap<String, Value>,
}

static FALLBACK: LazyLock<Arc<LocaleBundle>> = LazyLock::new(|| {
    let strings = Text::ALL
        .iter()
        .map(|t| (t.key().to_string(), Value::String(t.fallback().to_string())))
        .collect();
    Arc::new(LocaleBundle {
        sections: IndexMap::new(),
        strings,
    })
});

impl LocaleBundle {
    /// Parse a locale document
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// The constant, fully populated bundle
    pub fn fallback() -> Arc<LocaleBundle> {
        Arc::clone(&FALLBACK)
    }

    pub fn text(&self, text: Text) -> &str {
        non_empty_str(self.strings.get(text.key())).unwrap_or(text.fallback())
    }

    /// Display label for a category, if this bundle names one
    pub fn section(&self, category: &str) -> Option<&str> {
        non_empty_str(self.sections.get(category))
    }

    /// Display label for a category, upper-cased key when unnamed
    pub fn section_label(&self, category: &str) -> String {
        match self.section(category) {
            Some(label) => label.to_string(),
            None => category.to_uppercase(),
        }
    }
}

fn lenient_sections<'de, D>(deserializer: D) -> Result<IndexMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Null => Ok(IndexMap::new()),
        _ => {
            warn!("locale sections is not an object, ignoring it");
            Ok(IndexMap::new())
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
