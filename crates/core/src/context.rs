//! Context-window assembly: last-N transcript formatting, mention
//! resolution, and the author rename used to line human history up with the
//! bot identity before segmentation.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::segment::Entry;

// Raw mention tokens, with or without the nickname bang: <@!123> / <@123>
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<@!?(\d+)>").unwrap());

/// Replace mention tokens with display names from `names`. Tokens with an
/// unknown id are left untouched.
pub fn resolve_mentions(text: &str, names: &HashMap<u64, String>) -> String {
    MENTION_RE
        .replace_all(text, |caps: &regex::Captures| {
            caps[1]
                .parse::<u64>()
                .ok()
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// One transcript line: `"{author}: {text}"`.
pub fn format_entry(entry: &Entry) -> String {
    format!("{}: {}", entry.author, entry.text)
}

/// Join the last `count` entries into a trimmed multi-line transcript,
/// oldest first.
pub fn build_context(entries: &[Entry], count: usize) -> String {
    let start = entries.len().saturating_sub(count);
    let mut out = String::new();
    for entry in &entries[start..] {
        out.push_str(&format_entry(entry));
        out.push('\n');
    }
    out.trim().to_string()
}

/// Rewrite `from` to `to` in an entry's author identity and in any inline
/// occurrences in its text, so a human's history reads as the bot's.
pub fn rename_author(entry: &mut Entry, from: &str, to: &str) {
    if entry.author == from {
        entry.author = to.to_string();
    }
    if entry.text.contains(from) {
        entry.text = entry.text.replace(from, to);
    }
}
