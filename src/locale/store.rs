//! Locale resolution with a per-language cache

use super::bundle::{FALLBACK_LANG, LocaleBundle};
use crate::error::{Error, Result};
use crate::source::{DataSource, locale_document};
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// A bundle paired with the language it was resolved for.
///
/// The tag lives beside the bundle, never on it, so a cached bundle stays
/// shared and immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocale {
    bundle: Arc<LocaleBundle>,
    lang: String,
}

impl ResolvedLocale {
    pub fn new(bundle: Arc<LocaleBundle>, lang: impl Into<String>) -> Self {
        Self {
            bundle,
            lang: lang.into(),
        }
    }

    /// The fallback bundle tagged `"fallback"`
    pub fn fallback() -> Self {
        Self::new(LocaleBundle::fallback(), FALLBACK_LANG)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn bundle(&self) -> &Arc<LocaleBundle> {
        &self.bundle
    }

    pub fn is_fallback(&self) -> bool {
        self.lang == FALLBACK_LANG
    }
}

impl Deref for ResolvedLocale {
    type Target = LocaleBundle;

    fn deref(&self) -> &LocaleBundle {
        &self.bundle
    }
}

/// Loads locale bundles on demand and keeps every successful load
pub struct LocaleStore {
    source: Arc<dyn DataSource>,
    cache: Mutex<HashMap<String, Arc<LocaleBundle>>>,
}

impl LocaleStore {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a language code to a bundle.
    ///
    /// A cache hit never touches the source. A miss issues one load; when it
    /// fails the fallback bundle is returned and nothing is cached, so the
    /// next call for the same code loads again.
    pub async fn resolve(&self, lang: &str) -> ResolvedLocale {
        if let Some(bundle) = self.cached(lang) {
            debug!(lang, "locale cache hit");
            return ResolvedLocale::new(bundle, lang);
        }

        match self.load(lang).await {
            Ok(bundle) => {
                let bundle = Arc::new(bundle);
                // Concurrent misses for the same code converge on the last write
                self.lock_cache().insert(lang.to_string(), Arc::clone(&bundle));
                debug!(lang, "locale loaded");
                ResolvedLocale::new(bundle, lang)
            }
            Err(e) => {
                warn!(lang, error = %e, "locale unavailable, using fallback");
                ResolvedLocale::fallback()
            }
        }
    }

    /// Languages loaded so far, sorted
    pub fn cached_languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self.lock_cache().keys().cloned().collect();
        langs.sort();
        langs
    }

    fn cached(&self, lang: &str) -> Option<Arc<LocaleBundle>> {
        self.lock_cache().get(lang).cloned()
    }

    async fn load(&self, lang: &str) -> Result<LocaleBundle> {
        if !is_valid_language(lang) {
            return Err(Error::InvalidLanguage(lang.to_string()));
        }
        let path = locale_document(lang);
        let document = self.source.fetch(&path).await?;
        LocaleBundle::from_value(document).map_err(|source| Error::Json { path, source })
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<LocaleBundle>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Language codes are plain tokens such as `en`, `tr` or `pt-BR`
pub fn is_valid_language(lang: &str) -> bool {
    !lang.is_empty()
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
