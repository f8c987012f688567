pub mod sequencer;
pub mod sink;

pub use sequencer::{Outcome, Pacing, RenderSequencer};
pub use sink::{Line, LineId, RenderEvent, Sink, TerminalSink, Transcript, display_url};
