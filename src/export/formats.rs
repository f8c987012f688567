use super::{ExportDocument, Exporter};
use crate::dorks::RenderUnit;
use std::io::{self, Write};

/// Plain text laid out on fixed-size pages.
///
/// URLs are hard-wrapped at `width` columns (they rarely contain spaces)
/// and indented under their category label. A form feed starts each new
/// page.
#[derive(Debug, Clone, Copy)]
pub struct TextExporter {
    pub width: usize,
    pub page_lines: usize,
}

impl Default for TextExporter {
    fn default() -> Self {
        Self {
            width: 96,
            page_lines: 60,
        }
    }
}

const URL_INDENT: &str = "    ";

struct PageWriter<'a> {
    out: &'a mut dyn Write,
    page_lines: usize,
    line: usize,
}

impl PageWriter<'_> {
    fn line(&mut self, text: &str) -> io::Result<()> {
        if self.line >= self.page_lines {
            write!(self.out, "\x0c")?;
            self.line = 0;
        }
        writeln!(self.out, "{}", text)?;
        self.line += 1;
        Ok(())
    }
}

impl Exporter for TextExporter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write(
        &self,
        doc: &ExportDocument,
        out: &mut dyn Write,
        on_unit: &mut dyn FnMut(&RenderUnit),
    ) -> io::Result<()> {
        let mut page = PageWriter {
            out,
            page_lines: self.page_lines.max(1),
            line: 0,
        };
        let url_width = self.width.saturating_sub(URL_INDENT.len()).max(1);

        page.line(&doc.title)?;
        page.line(&doc.generated_display())?;
        page.line(&format!("query: {}  lang: {}", doc.query, doc.language))?;
        page.line("")?;

        for unit in &doc.units {
            page.line(&unit.label)?;
            for url in &unit.urls {
                for chunk in wrap_chars(url, url_width) {
                    page.line(&format!("{}{}", URL_INDENT, chunk))?;
                }
            }
            page.line("")?;
            on_unit(unit);
        }
        Ok(())
    }
}

/// Split into pieces of at most `width` characters
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn write(
        &self,
        doc: &ExportDocument,
        out: &mut dyn Write,
        on_unit: &mut dyn FnMut(&RenderUnit),
    ) -> io::Result<()> {
        writeln!(out, "# {}", doc.title)?;
        writeln!(out)?;
        writeln!(out, "- generated: {}", doc.generated_display())?;
        writeln!(out, "- query: `{}`", doc.query)?;
        writeln!(out, "- lang: `{}`", doc.language)?;
        for unit in &doc.units {
            writeln!(out)?;
            writeln!(out, "## {}", unit.label)?;
            writeln!(out)?;
            for url in &unit.urls {
                writeln!(out, "- <{}>", url)?;
            }
            on_unit(unit);
        }
        Ok(())
    }
}

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(
        &self,
        doc: &ExportDocument,
        out: &mut dyn Write,
        on_unit: &mut dyn FnMut(&RenderUnit),
    ) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, doc)?;
        writeln!(out)?;
        for unit in &doc.units {
            on_unit(unit);
        }
        Ok(())
    }
}
