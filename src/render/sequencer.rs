//! Paced rendering of one search
//!
//! A sequence validates the query, announces it as a typed line, emits one
//! block per category with a short pause between blocks, and finishes with a
//! status line and a typed "done" line.
//!
//! Sequences are not locked against each other. Starting a new one bumps a
//! generation counter and clears the sink; an older sequence notices at its
//! next suspension point that it is no longer current and stops without
//! emitting anything else.
//!
//! An empty query only types a warning. It claims no generation, so a
//! sequence already running keeps going and the two typed lines share the
//! sink, each under its own [`LineId`].

use super::sink::{LineId, RenderEvent, Sink};
use crate::context::Context;
use crate::error::Result;
use crate::locale::Text;
use crate::query::EncodedQuery;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay between revealed characters of a typed line
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(6);
/// Pause after each category block
pub const DEFAULT_CATEGORY_DELAY: Duration = Duration::from_millis(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub char_delay: Duration,
    pub category_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            char_delay: DEFAULT_CHAR_DELAY,
            category_delay: DEFAULT_CATEGORY_DELAY,
        }
    }
}

impl Pacing {
    /// No delays; each step still yields to other tasks
    pub fn instant() -> Self {
        Self {
            char_delay: Duration::ZERO,
            category_delay: Duration::ZERO,
        }
    }
}

/// How a sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Empty query, only the warning line was shown
    Rejected,
    /// Ran to the end
    Completed { total: usize },
    /// A newer sequence took over the sink
    Superseded,
}

pub struct RenderSequencer<S: Sink> {
    ctx: Arc<Context>,
    sink: Arc<Mutex<S>>,
    pacing: Pacing,
    generation: Arc<AtomicU64>,
    next_line: Arc<AtomicU64>,
}

impl<S: Sink> Clone for RenderSequencer<S> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            sink: Arc::clone(&self.sink),
            pacing: self.pacing,
            generation: Arc::clone(&self.generation),
            next_line: Arc::clone(&self.next_line),
        }
    }
}

impl<S: Sink + 'static> RenderSequencer<S> {
    pub fn new(ctx: Arc<Context>, sink: Arc<Mutex<S>>, pacing: Pacing) -> Self {
        Self {
            ctx,
            sink,
            pacing,
            generation: Arc::new(AtomicU64::new(0)),
            next_line: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn sink(&self) -> &Arc<Mutex<S>> {
        &self.sink
    }

    /// Run a sequence as a background task
    pub fn spawn(&self, query: impl Into<String>) -> JoinHandle<Result<Outcome>> {
        let this = self.clone();
        let query = query.into();
        tokio::spawn(async move { this.run(&query).await })
    }

    /// Run a sequence to completion.
    ///
    /// The active locale is read once at the start; a language switch while
    /// the sequence runs does not affect it.
    pub async fn run(&self, raw: &str) -> Result<Outcome> {
        let locale = self.ctx.locale();
        let query = EncodedQuery::new(raw);

        if query.is_empty() {
            let generation = self.generation.load(Ordering::SeqCst);
            if !self.typed_line(generation, locale.text(Text::ConsoleWarnNoInput)).await? {
                return Ok(Outcome::Superseded);
            }
            return Ok(Outcome::Rejected);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, query = %query.raw, "render sequence started");

        self.emit(generation, RenderEvent::Clear)?;
        self.emit(
            generation,
            RenderEvent::Status(locale.text(Text::ResultsProcessing).to_string()),
        )?;

        let announce = format!("{}{}", locale.text(Text::ConsoleSending), query.raw);
        if !self.typed_line(generation, &announce).await? {
            return Ok(self.superseded(generation));
        }

        let dictionary = self.ctx.dictionary();
        let mut total = 0;

        if dictionary.is_empty() {
            if !self.typed_line(generation, locale.text(Text::ConsoleDorksMissing)).await? {
                return Ok(self.superseded(generation));
            }
        } else {
            for unit in dictionary.render_units(&query, &locale) {
                let count = unit.urls.len();
                if !self.emit(generation, RenderEvent::Block(unit))? {
                    return Ok(self.superseded(generation));
                }
                total += count;
                self.pause(self.pacing.category_delay).await;
            }
        }

        let status = if total > 0 {
            format!("{} {}", total, locale.text(Text::ResultsFound))
        } else {
            locale.text(Text::ResultsNone).to_string()
        };
        if !self.emit(generation, RenderEvent::Status(status))? {
            return Ok(self.superseded(generation));
        }
        if !self.typed_line(generation, locale.text(Text::ConsoleDone)).await? {
            return Ok(self.superseded(generation));
        }

        debug!(generation, total, "render sequence completed");
        Ok(Outcome::Completed { total })
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn superseded(&self, generation: u64) -> Outcome {
        debug!(generation, "render sequence superseded");
        Outcome::Superseded
    }

    /// Emit one event if this sequence is still current.
    /// Returns `false` when it has been superseded.
    fn emit(&self, generation: u64, event: RenderEvent) -> Result<bool> {
        if !self.is_current(generation) {
            return Ok(false);
        }
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        sink.emit(event)?;
        Ok(true)
    }

    /// Reveal a line one character at a time
    async fn typed_line(&self, generation: u64, text: &str) -> Result<bool> {
        let line = LineId(self.next_line.fetch_add(1, Ordering::Relaxed));
        if !self.emit(generation, RenderEvent::LineStart(line))? {
            return Ok(false);
        }
        for c in text.chars() {
            self.pause(self.pacing.char_delay).await;
            if !self.emit(generation, RenderEvent::Char(line, c))? {
                return Ok(false);
            }
        }
        self.emit(generation, RenderEvent::LineEnd(line))
    }

    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
