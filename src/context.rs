//! Shared application state
//!
//! The dictionary, the locale cache and the current-locale pointer live in a
//! [`Context`] that is handed to the sequencer and the exporter. The context
//! is built with [`Context::init`], which performs the two startup loads.
//! There is no teardown.

use crate::dorks::TemplateDictionary;
use crate::locale::{LocaleStore, ResolvedLocale};
use crate::source::DataSource;
use std::sync::{Arc, RwLock};
use tracing::info;

pub struct Context {
    dictionary: TemplateDictionary,
    locales: LocaleStore,
    current: RwLock<ResolvedLocale>,
}

impl Context {
    /// Load the dictionary and resolve the initial language
    pub async fn init(source: Arc<dyn DataSource>, lang: &str) -> Arc<Self> {
        let dictionary = TemplateDictionary::load(source.as_ref()).await;
        let locales = LocaleStore::new(source);
        let current = locales.resolve(lang).await;

        info!(
            categories = dictionary.category_count(),
            lang = current.lang(),
            "context initialized"
        );

        Arc::new(Self {
            dictionary,
            locales,
            current: RwLock::new(current),
        })
    }

    /// Build a context from already-loaded parts
    pub fn with_parts(
        dictionary: TemplateDictionary,
        locales: LocaleStore,
        current: ResolvedLocale,
    ) -> Arc<Self> {
        Arc::new(Self {
            dictionary,
            locales,
            current: RwLock::new(current),
        })
    }

    pub fn dictionary(&self) -> &TemplateDictionary {
        &self.dictionary
    }

    pub fn locales(&self) -> &LocaleStore {
        &self.locales
    }

    /// Snapshot of the active locale
    pub fn locale(&self) -> ResolvedLocale {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Resolve `lang` and make it the active locale.
    ///
    /// The pointer is swapped after the load completes; sequences already
    /// running keep the snapshot they started with.
    pub async fn set_language(&self, lang: &str) -> ResolvedLocale {
        let resolved = self.locales.resolve(lang).await;
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = resolved.clone();
        resolved
    }
}
