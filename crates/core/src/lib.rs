//! Core logic for chat-distill.
//!
//! This crate turns a chat bot's conversation history into a fine-tuning
//! dataset and carries the bot's pure decision helpers. The centerpiece is
//! the [`Segmenter`], which walks an ordered chat log and cuts it into
//! prompt/completion training pairs at every target-author turn boundary.
//! Around it sit the reply gate, context-window assembly, the
//! completion-service seam, and the distillation [`pipeline`].

mod completion;
mod config;
mod context;
mod error;
mod gate;
pub mod pipeline;
mod segment;

pub use completion::{
    build_prompt, first_reply_line, CompletionClient, CompletionError, FALLBACK_REPLY,
};
pub use config::BotConfig;
pub use context::{build_context, format_entry, rename_author, resolve_mentions};
pub use error::{Error, Result};
pub use gate::{reply_chance, should_reply};
pub use pipeline::{
    discover_history_logs, process_all_logs, process_log, read_history_log, write_jsonl,
    DistillOptions, DistillStats, LogResult,
};
pub use segment::{segment_log, Entry, Segmenter, SegmenterOptions, TrainingExample};

/// Default reply probability immediately after a post.
pub const DEFAULT_MIN_CHANCE: f64 = 0.05;

/// Default reply probability once the threshold window has elapsed.
pub const DEFAULT_MAX_CHANCE: f64 = 0.95;

/// Default window, in hours, over which the reply chance ramps up.
pub const DEFAULT_THRESHOLD_HOURS: f64 = 10.0;

/// Default number of history messages assembled into the reply context.
pub const DEFAULT_CONTEXT_COUNT: usize = 5;
