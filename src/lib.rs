//! # Krasnyy - Dork Generator
//!
//! Krasnyy turns a search term into categorized search-engine query URLs
//! ("dorks") for OSINT research, reveals them progressively in the terminal
//! and exports them as documents.
//!
//! ## Architecture
//!
//! - [`query`] - Query encoding and template expansion
//! - [`dorks`] - The category -> templates dictionary and its ordering rule
//! - [`locale`] - Localized UI text with a cache and a built-in fallback
//! - [`context`] - Dictionary, locale cache and active locale, loaded once
//! - [`render`] - Paced, ordered rendering into a [`render::Sink`]
//! - [`export`] - Unpaced materialization and document exporters
//! - [`source`] - Where documents come from (disk, memory)
//! - [`utils`] - Configuration and progress display
//!
//! ## Quick Start
//!
//! ```no_run
//! use krasnyy::context::Context;
//! use krasnyy::render::{Pacing, RenderSequencer, TerminalSink};
//! use krasnyy::source::FsSource;
//! use std::sync::{Arc, Mutex};
//!
//! # async fn demo() -> krasnyy::Result<()> {
//! let ctx = Context::init(Arc::new(FsSource::new("data")), "en").await;
//! let sink = Arc::new(Mutex::new(TerminalSink::new(termcolor::ColorChoice::Auto)));
//! let sequencer = RenderSequencer::new(ctx, sink, Pacing::default());
//! sequencer.run("john doe").await?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod dorks;
pub mod error;
pub mod export;
pub mod locale;
pub mod query;
pub mod render;
pub mod source;
pub mod utils;

pub use error::{Error, Result};
