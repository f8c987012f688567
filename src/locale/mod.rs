pub mod bundle;
pub mod store;

pub use bundle::{FALLBACK_LANG, LocaleBundle, Text};
pub use store::{LocaleStore, ResolvedLocale, is_valid_language};
