//! Document sources
//!
//! The dictionary and locale bundles are JSON documents addressed by a
//! relative path (`dorks.json`, `locales/en.json`). A [`DataSource`] fetches
//! and parses one such document; callers decide how to recover when it
//! fails.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub const DORKS_DOCUMENT: &str = "dorks.json";

/// Path of the locale document for a language code
pub fn locale_document(lang: &str) -> String {
    format!("locales/{}.json", lang)
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Value>;
}

/// Reads documents from a directory on disk
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Language codes with a document under `locales/`, sorted
    pub fn available_languages(&self) -> Result<Vec<String>> {
        let dir = self.root.join("locales");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut langs = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                langs.push(stem.to_string());
            }
        }
        langs.sort();
        Ok(langs)
    }
}

#[async_trait]
impl DataSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        let full = self.root.join(path);
        let content = match tokio::fs::read_to_string(&full).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(full.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| Error::Json {
            path: full.display().to_string(),
            source,
        })
    }
}

/// In-memory documents, also counts fetches per path
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: HashMap<String, Value>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, document: Value) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    /// Number of times `path` has been requested
    pub fn fetch_count(&self, path: &str) -> usize {
        let fetches = self.fetches.lock().unwrap_or_else(|e| e.into_inner());
        fetches.get(path).copied().unwrap_or(0)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        {
            let mut fetches = self.fetches.lock().unwrap_or_else(|e| e.into_inner());
            *fetches.entry(path.to_string()).or_insert(0) += 1;
        }
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fs_source_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("locales")).unwrap();
        std::fs::write(dir.path().join("locales/en.json"), r#"{"title": "T"}"#).unwrap();

        let source = FsSource::new(dir.path());
        let doc = source.fetch(&locale_document("en")).await.unwrap();
        assert_eq!(doc, json!({"title": "T"}));
    }

    #[tokio::test]
    async fn test_fs_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new(dir.path());
        let err = source.fetch(DORKS_DOCUMENT).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fs_source_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DORKS_DOCUMENT), "{ not json").unwrap();
        let source = FsSource::new(dir.path());
        let err = source.fetch(DORKS_DOCUMENT).await.unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_available_languages() {
        let dir = tempfile::tempdir().unwrap();
        let locales = dir.path().join("locales");
        std::fs::create_dir_all(&locales).unwrap();
        for name in ["tr.json", "en.json", "notes.txt"] {
            std::fs::write(locales.join(name), "{}").unwrap();
        }

        let source = FsSource::new(dir.path());
        assert_eq!(source.available_languages().unwrap(), vec!["en", "tr"]);
        assert!(FsSource::new(dir.path().join("missing")).available_languages().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_source_counts_fetches() {
        let source = MemorySource::new().with("a.json", json!([]));
        assert!(source.fetch("a.json").await.is_ok());
        assert!(source.fetch("b.json").await.is_err());
        assert!(source.fetch("a.json").await.is_ok());
        assert_eq!(source.fetch_count("a.json"), 2);
        assert_eq!(source.fetch_count("b.json"), 1);
        assert_eq!(source.fetch_count("c.json"), 0);
    }
}
