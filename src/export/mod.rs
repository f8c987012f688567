//! Document export
//!
//! Export materializes the same category blocks a render sequence would
//! show, without pacing, and hands them to an [`Exporter`] that owns the
//! document layout.
//!
//! ## Formats
//!
//! - [`TextExporter`] - paginated plain text
//! - [`MarkdownExporter`] - one heading per category
//! - [`JsonExporter`] - the document as JSON
//!
//! `pdf` is recognized but has no renderer in this build, so asking for it
//! yields [`Error::ExportUnavailable`].

mod formats;

pub use formats::{JsonExporter, MarkdownExporter, TextExporter};

use crate::dorks::{RenderUnit, TemplateDictionary};
use crate::error::{Error, Result};
use crate::locale::{ResolvedLocale, Text};
use crate::query::EncodedQuery;
use crate::utils::progress::{ProgressBar, ProgressStyle};
use chrono::{DateTime, Datelike, FixedOffset, Local};
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything an exporter needs to lay out a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub title: String,
    /// Language tag of the resolved locale (`"fallback"` included)
    pub language: String,
    pub query: String,
    /// Local time the document was materialized
    pub generated_at: DateTime<FixedOffset>,
    pub units: Vec<RenderUnit>,
}

impl ExportDocument {
    pub fn total(&self) -> usize {
        self.units.iter().map(|u| u.urls.len()).sum()
    }

    /// Generation time written the way the document's language writes dates
    pub fn generated_display(&self) -> String {
        format_timestamp(&self.generated_at, &self.language)
    }
}

/// Expand every category for a query, in render order
pub fn materialize(
    dictionary: &TemplateDictionary,
    locale: &ResolvedLocale,
    raw: &str,
) -> ExportDocument {
    materialize_at(dictionary, locale, raw, Local::now().fixed_offset())
}

/// [`materialize`] with an explicit generation time
pub fn materialize_at(
    dictionary: &TemplateDictionary,
    locale: &ResolvedLocale,
    raw: &str,
    generated_at: DateTime<FixedOffset>,
) -> ExportDocument {
    let query = EncodedQuery::new(raw);
    let units = dictionary.render_units(&query, locale).collect();
    ExportDocument {
        title: locale.text(Text::Title).to_string(),
        language: locale.lang().to_string(),
        query: query.raw,
        generated_at,
        units,
    }
}

const TR_MONTHS: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];

/// Medium date, short time. Turkish and English get their own layout;
/// any other tag gets ISO 8601.
pub fn format_timestamp(at: &DateTime<FixedOffset>, lang: &str) -> String {
    match lang {
        "tr" => format!(
            "{} {} {} {}",
            at.day(),
            TR_MONTHS[at.month0() as usize],
            at.year(),
            at.format("%H:%M")
        ),
        "en" => at.format("%b %-d, %Y, %-I:%M %p").to_string(),
        _ => at.format("%Y-%m-%d %H:%M").to_string(),
    }
}

pub trait Exporter {
    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    /// Called once per category as it is written
    fn write(
        &self,
        doc: &ExportDocument,
        out: &mut dyn Write,
        on_unit: &mut dyn FnMut(&RenderUnit),
    ) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "pdf" => Err(Error::ExportUnavailable("PDF")),
            _ => Err(Error::UnknownFormat(name.to_string())),
        }
    }

    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Self::Text => Box::new(TextExporter::default()),
            Self::Markdown => Box::new(MarkdownExporter),
            Self::Json => Box::new(JsonExporter),
        }
    }
}

/// `krasnyy_links_<lang>.<ext>`
pub fn export_file_name(lang: &str, extension: &str) -> String {
    let lang = if lang.is_empty() { "lang" } else { lang };
    format!("krasnyy_links_{}.{}", lang, extension)
}

/// Write a document into `dir` and return the file path
pub fn export_to_dir(dir: &Path, exporter: &dyn Exporter, doc: &ExportDocument) -> Result<PathBuf> {
    let path = dir.join(export_file_name(&doc.language, exporter.extension()));
    let wrap = |source: io::Error| Error::Export {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(wrap)?;
    let file = fs::File::create(&path).map_err(wrap)?;
    let mut out = BufWriter::new(file);

    let pb = ProgressBar::new(doc.units.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.red} [{bar:30.red/white}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    exporter
        .write(doc, &mut out, &mut |unit: &RenderUnit| {
            pb.set_message(unit.label.clone());
            pb.inc(1);
        })
        .map_err(wrap)?;
    out.flush().map_err(wrap)?;
    pb.finish_and_clear();

    info!(path = %path.display(), categories = doc.units.len(), urls = doc.total(), "export written");
    Ok(path)
}
