//! Prompt construction and reply extraction for the hosted completion
//! service. The transport itself lives behind [`CompletionClient`]; failures
//! come back as values so callers choose their own fallback.

/// Reply the bot falls back to when the completion service fails.
pub const FALLBACK_REPLY: &str = r"¯\_(ツ)_/¯";

/// A failed completion request, with the provider's reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("completion request failed: {reason}")]
pub struct CompletionError {
    pub reason: String,
}

impl CompletionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Seam for the hosted text-generation service.
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}

/// Assemble the full prompt: instruction prefix, blank line, context window,
/// then the cue line naming the bot.
pub fn build_prompt(prefix: &str, context: &str, bot_name: &str) -> String {
    format!("{prefix}\n\n{context}\n{bot_name}:")
}

/// First non-whitespace line of a raw completion response.
pub fn first_reply_line(raw: &str) -> String {
    raw.trim().lines().next().unwrap_or("").to_string()
}
