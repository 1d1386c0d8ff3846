//! Turn-boundary segmentation of chat logs into prompt/completion pairs.
//!
//! A log is an ordered list of authored entries, oldest first. One author is
//! the "target": their messages become completions, everyone else's messages
//! become the prompt context that precedes them. A training example is cut at
//! every target→other transition.

use serde::{Deserialize, Serialize};

/// One authored unit of conversation.
///
/// History logs store entries as two-element `[author, text]` arrays, so
/// deserialization goes through the tuple form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Entry {
    pub author: String,
    pub text: String,
}

impl Entry {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

impl From<(String, String)> for Entry {
    fn from((author, text): (String, String)) -> Self {
        Self { author, text }
    }
}

/// A single prompt/completion pair, serialized as one JSONL record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub prompt: String,
    pub completion: String,
}

/// Identity class of the most recently processed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastSource {
    None,
    Other,
    Target,
}

/// Options for the segmentation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmenterOptions {
    /// Also finalize a turn left open at the end of the log.
    ///
    /// The default (`false`) matches the historical behavior: a log ending
    /// mid-turn for the target author silently drops that trailing turn.
    pub flush_trailing: bool,
}

/// Walks an ordered entry sequence and cuts it into training examples.
///
/// Prompt lines accumulate from non-target entries as `"{author}: {text}"`;
/// target entries accumulate newline-joined into a single completion, even
/// across consecutive messages. The example is finalized when a non-target
/// entry follows a target turn.
pub struct Segmenter {
    target_author: String,
    options: SegmenterOptions,
    prompt_buf: String,
    completion_buf: String,
    last_source: LastSource,
    examples: Vec<TrainingExample>,
}

impl Segmenter {
    pub fn new(target_author: impl Into<String>) -> Self {
        Self::with_options(target_author, SegmenterOptions::default())
    }

    pub fn with_options(target_author: impl Into<String>, options: SegmenterOptions) -> Self {
        Self {
            target_author: target_author.into(),
            options,
            prompt_buf: String::new(),
            completion_buf: String::new(),
            last_source: LastSource::None,
            examples: Vec::new(),
        }
    }

    /// Process one entry, in log order.
    pub fn push(&mut self, entry: &Entry) {
        if entry.author == self.target_author {
            // Consecutive target entries keep growing one completion; a turn
            // only closes when somebody else speaks.
            self.last_source = LastSource::Target;
            self.completion_buf.push_str(&entry.text);
            self.completion_buf.push('\n');
        } else {
            if self.last_source == LastSource::Target {
                self.finalize_turn();
            }
            self.last_source = LastSource::Other;
            self.prompt_buf.push_str(&entry.author);
            self.prompt_buf.push_str(": ");
            self.prompt_buf.push_str(&entry.text);
            self.prompt_buf.push('\n');
        }
    }

    /// Close the current turn: cue the prompt, trim the completion, emit the
    /// example unless the completion is empty, and reset the buffers.
    fn finalize_turn(&mut self) {
        let prompt = format!("{}\n{}:", self.prompt_buf.trim(), self.target_author);
        let completion = self.completion_buf.trim().to_string();

        if !completion.is_empty() {
            self.examples.push(TrainingExample {
                prompt,
                completion: format!(" {completion}"),
            });
        }

        self.prompt_buf.clear();
        self.completion_buf.clear();
        self.last_source = LastSource::None;
    }

    /// End the pass and return the discovered examples in emission order.
    pub fn finish(mut self) -> Vec<TrainingExample> {
        if self.options.flush_trailing && self.last_source == LastSource::Target {
            self.finalize_turn();
        }
        self.examples
    }
}

/// Segment a full log in one call with default options.
pub fn segment_log(entries: &[Entry], target_author: &str) -> Vec<TrainingExample> {
    let mut segmenter = Segmenter::new(target_author);
    for entry in entries {
        segmenter.push(entry);
    }
    segmenter.finish()
}
