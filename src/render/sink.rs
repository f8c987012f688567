//! Render sinks
//!
//! A [`Sink`] is the presentation side of a render sequence. It receives
//! [`RenderEvent`]s strictly in order and decides how to show them.
//!
//! Typed lines carry a [`LineId`]. Two lines may be typed at the same time
//! (a warning typed while a search is still announcing), and their
//! characters arrive interleaved; a sink keeps each line whole.

use crate::dorks::RenderUnit;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Longest URL shown in full on a terminal
pub const MAX_DISPLAY_URL: usize = 200;

/// Printed where a terminal cannot clear what a previous search showed
pub const CLEAR_SEPARATOR: &str = "────────────────────────────────────────";

/// Identity of one typed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// Drop everything shown so far
    Clear,
    /// A typed line begins
    LineStart(LineId),
    /// One revealed character of a typed line
    Char(LineId, char),
    /// The typed line is complete
    LineEnd(LineId),
    /// One category's URLs
    Block(RenderUnit),
    /// Replace the results status text
    Status(String),
}

pub trait Sink: Send {
    fn emit(&mut self, event: RenderEvent) -> io::Result<()>;
}

/// One displayed line of a [`Transcript`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Typed(String),
    Block(RenderUnit),
}

/// Records what a viewer would currently see
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<Line>,
    /// Typed lines still receiving characters, by index into `lines`
    open: HashMap<LineId, usize>,
    status: Option<String>,
    events: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Total events received, including cleared ones
    pub fn event_count(&self) -> usize {
        self.events
    }

    pub fn typed_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Typed(text) => Some(text.as_str()),
                Line::Block(_) => None,
            })
            .collect()
    }

    pub fn blocks(&self) -> Vec<&RenderUnit> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Block(unit) => Some(unit),
                Line::Typed(_) => None,
            })
            .collect()
    }

    fn open_line(&mut self, id: LineId) -> usize {
        if let Some(&index) = self.open.get(&id) {
            return index;
        }
        self.lines.push(Line::Typed(String::new()));
        let index = self.lines.len() - 1;
        self.open.insert(id, index);
        index
    }
}

impl Sink for Transcript {
    fn emit(&mut self, event: RenderEvent) -> io::Result<()> {
        self.events += 1;
        match event {
            RenderEvent::Clear => {
                self.lines.clear();
                self.open.clear();
            }
            RenderEvent::LineStart(id) => {
                self.open_line(id);
            }
            RenderEvent::Char(id, c) => {
                let index = self.open_line(id);
                if let Line::Typed(text) = &mut self.lines[index] {
                    text.push(c);
                }
            }
            RenderEvent::LineEnd(id) => {
                self.open.remove(&id);
            }
            RenderEvent::Block(unit) => self.lines.push(Line::Block(unit)),
            RenderEvent::Status(text) => self.status = Some(text),
        }
        Ok(())
    }
}

/// Writes events to a color terminal.
///
/// A terminal only appends, so a second typed line can't be shown until the
/// first one ends. While a line is being typed, events that belong to
/// anything else are held back and replayed when it ends.
pub struct TerminalSink<W: WriteColor = StandardStream> {
    out: W,
    active: Option<LineId>,
    held: Vec<RenderEvent>,
}

impl TerminalSink {
    pub fn new(choice: ColorChoice) -> Self {
        Self::with_writer(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> TerminalSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            active: None,
            held: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn write_event(&mut self, event: RenderEvent) -> io::Result<()> {
        match event {
            RenderEvent::Clear => {
                self.held.clear();
                self.out.reset()?;
                if self.active.take().is_some() {
                    writeln!(self.out)?;
                }
                self.out.set_color(ColorSpec::new().set_dimmed(true))?;
                writeln!(self.out, "{}", CLEAR_SEPARATOR)?;
                self.out.reset()?;
            }
            RenderEvent::LineStart(id) => {
                self.active = Some(id);
                self.out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            }
            RenderEvent::Char(_, c) => {
                write!(self.out, "{}", c)?;
                self.out.flush()?;
            }
            RenderEvent::LineEnd(_) => {
                self.active = None;
                self.out.reset()?;
                writeln!(self.out)?;
                self.replay_held()?;
            }
            RenderEvent::Block(unit) => {
                self.out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                writeln!(self.out, "{}", unit.label)?;
                self.out.reset()?;
                for url in &unit.urls {
                    writeln!(self.out, "  {}", display_url(url))?;
                }
            }
            RenderEvent::Status(text) => {
                self.out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                writeln!(self.out, "[{}]", text)?;
                self.out.reset()?;
            }
        }
        Ok(())
    }

    fn replay_held(&mut self) -> io::Result<()> {
        for event in std::mem::take(&mut self.held) {
            self.route(event)?;
        }
        Ok(())
    }

    fn route(&mut self, event: RenderEvent) -> io::Result<()> {
        match self.active {
            Some(_) if matches!(event, RenderEvent::Clear) => self.write_event(event),
            Some(active) if line_of(&event) != Some(active) => {
                self.held.push(event);
                Ok(())
            }
            _ => self.write_event(event),
        }
    }
}

/// Typed line an event belongs to, if any
fn line_of(event: &RenderEvent) -> Option<LineId> {
    match event {
        RenderEvent::LineStart(id) | RenderEvent::Char(id, _) | RenderEvent::LineEnd(id) => {
            Some(*id)
        }
        _ => None,
    }
}

impl<W: WriteColor + Send> Sink for TerminalSink<W> {
    fn emit(&mut self, event: RenderEvent) -> io::Result<()> {
        self.route(event)
    }
}

/// Shorten very long URLs for display; exports keep the full text
pub fn display_url(url: &str) -> Cow<'_, str> {
    if url.chars().count() <= MAX_DISPLAY_URL {
        return Cow::Borrowed(url);
    }
    let mut short: String = url.chars().take(MAX_DISPLAY_URL - 4).collect();
    short.push_str("...");
    Cow::Owned(short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    fn unit(category: &str) -> RenderUnit {
        RenderUnit {
            category: category.to_string(),
            label: category.to_uppercase(),
            urls: vec![format!("https://{}.example/", category)],
        }
    }

    fn type_line(sink: &mut dyn Sink, id: u64, text: &str) {
        sink.emit(RenderEvent::LineStart(LineId(id))).unwrap();
        for c in text.chars() {
            sink.emit(RenderEvent::Char(LineId(id), c)).unwrap();
        }
        sink.emit(RenderEvent::LineEnd(LineId(id))).unwrap();
    }

    /// Two lines typed at once, their characters alternating
    fn interleave(sink: &mut dyn Sink, first: &str, second: &str) {
        let (a, b) = (LineId(1), LineId(2));
        sink.emit(RenderEvent::LineStart(a)).unwrap();
        sink.emit(RenderEvent::LineStart(b)).unwrap();
        let mut left = first.chars();
        let mut right = second.chars();
        loop {
            let l = left.next();
            let r = right.next();
            if l.is_none() && r.is_none() {
                break;
            }
            if let Some(c) = l {
                sink.emit(RenderEvent::Char(a, c)).unwrap();
            }
            if let Some(c) = r {
                sink.emit(RenderEvent::Char(b, c)).unwrap();
            }
        }
        sink.emit(RenderEvent::LineEnd(b)).unwrap();
        sink.emit(RenderEvent::LineEnd(a)).unwrap();
    }

    fn terminal() -> TerminalSink<NoColor<Vec<u8>>> {
        TerminalSink::with_writer(NoColor::new(Vec::new()))
    }

    fn output(sink: &TerminalSink<NoColor<Vec<u8>>>) -> String {
        String::from_utf8(sink.get_ref().get_ref().clone()).unwrap()
    }

    #[test]
    fn test_transcript_assembles_typed_lines() {
        let mut t = Transcript::new();
        type_line(&mut t, 1, "hi");
        t.emit(RenderEvent::Block(unit("a"))).unwrap();

        assert_eq!(t.typed_lines(), vec!["hi"]);
        assert_eq!(t.blocks().len(), 1);
        assert_eq!(t.event_count(), 5);
    }

    #[test]
    fn test_transcript_clear_keeps_status() {
        let mut t = Transcript::new();
        t.emit(RenderEvent::Status("Processing...".into())).unwrap();
        t.emit(RenderEvent::Block(unit("a"))).unwrap();
        t.emit(RenderEvent::Clear).unwrap();

        assert!(t.lines().is_empty());
        assert_eq!(t.status(), Some("Processing..."));
    }

    #[test]
    fn test_transcript_keeps_concurrent_lines_apart() {
        let mut t = Transcript::new();
        interleave(&mut t, ">> alice", "⚠ empty");

        assert_eq!(t.typed_lines(), vec![">> alice", "⚠ empty"]);
    }

    #[test]
    fn test_terminal_holds_second_line_until_first_ends() {
        let mut sink = terminal();
        interleave(&mut sink, ">> alice", "⚠ empty");
        sink.emit(RenderEvent::Block(unit("a"))).unwrap();

        assert_eq!(output(&sink), ">> alice\n⚠ empty\nA\n  https://a.example/\n");
    }

    #[test]
    fn test_terminal_holds_blocks_behind_typed_line() {
        let mut sink = terminal();
        sink.emit(RenderEvent::LineStart(LineId(1))).unwrap();
        sink.emit(RenderEvent::Char(LineId(1), 'x')).unwrap();
        sink.emit(RenderEvent::Status("1 found".into())).unwrap();
        sink.emit(RenderEvent::Char(LineId(1), 'y')).unwrap();
        sink.emit(RenderEvent::LineEnd(LineId(1))).unwrap();

        assert_eq!(output(&sink), "xy\n[1 found]\n");
    }

    #[test]
    fn test_terminal_clear_prints_separator() {
        let mut sink = terminal();
        type_line(&mut sink, 1, "old");
        sink.emit(RenderEvent::LineStart(LineId(2))).unwrap();
        sink.emit(RenderEvent::Char(LineId(2), 'o')).unwrap();
        sink.emit(RenderEvent::Clear).unwrap();
        type_line(&mut sink, 3, "new");

        assert_eq!(output(&sink), format!("old\no\n{}\nnew\n", CLEAR_SEPARATOR));
    }

    #[test]
    fn test_display_url_short_untouched() {
        let url = "https://example.com/?q=a";
        assert!(matches!(display_url(url), Cow::Borrowed(_)));
    }

    #[test]
    fn test_display_url_truncates() {
        let url = format!("https://example.com/{}", "a".repeat(300));
        let shown = display_url(&url);
        assert_eq!(shown.chars().count(), 199);
        assert!(shown.ends_with("..."));
        assert!(url.starts_with(&shown[..196]));
    }

    #[test]
    fn test_display_url_boundary() {
        let url = "b".repeat(MAX_DISPLAY_URL);
        assert_eq!(display_url(&url), url.as_str());
    }
}
