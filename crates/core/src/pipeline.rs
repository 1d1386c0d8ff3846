//! Offline distillation pipeline: history logs in, training JSONL out.
//!
//! A history log is a JSON array of `[author, text]` pairs, oldest first.
//! Each log is segmented independently; discovered examples are appended to
//! the output file in discovery order, one JSON object per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::context::rename_author;
use crate::error::{Error, Result};
use crate::segment::{Entry, Segmenter, SegmenterOptions, TrainingExample};

/// Options for one distillation run.
#[derive(Debug, Clone)]
pub struct DistillOptions {
    /// Author whose messages become completions.
    pub target_author: String,
    /// Rewrite this author's identity to the target author before
    /// segmenting, so a human's history trains the bot's voice.
    pub replace_author: Option<String>,
    /// Also emit a turn left open at the end of a log.
    pub flush_trailing: bool,
}

/// Examples extracted from a single history log.
#[derive(Debug)]
pub struct LogResult {
    pub examples: Vec<TrainingExample>,
    pub entries_read: usize,
    pub source_path: String,
}

/// Counters for a completed run.
#[derive(Debug, Serialize)]
pub struct DistillStats {
    pub total_logs: usize,
    pub total_entries: usize,
    pub total_examples: usize,
}

/// Read one history log file.
pub fn read_history_log(path: &Path) -> Result<Vec<Entry>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Discover all `.json` history logs under a directory, sorted by path.
pub fn discover_history_logs(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Segment a single history log.
pub fn process_log(path: &Path, options: &DistillOptions) -> Result<LogResult> {
    let mut entries = read_history_log(path)?;

    if let Some(replace) = &options.replace_author {
        for entry in &mut entries {
            rename_author(entry, replace, &options.target_author);
        }
    }

    let mut segmenter = Segmenter::with_options(
        &options.target_author,
        SegmenterOptions {
            flush_trailing: options.flush_trailing,
        },
    );
    for entry in &entries {
        segmenter.push(entry);
    }

    Ok(LogResult {
        examples: segmenter.finish(),
        entries_read: entries.len(),
        source_path: path.to_string_lossy().to_string(),
    })
}

/// Segment every history log under `root` (or the single file `root`)
/// in parallel.
///
/// Files are independent, so rayon may process them concurrently; result
/// order stays the sorted discovery order. A log that fails to parse is
/// skipped with a warning rather than aborting the run.
pub fn process_all_logs(root: &Path, options: &DistillOptions) -> Result<Vec<LogResult>> {
    let log_files = if root.is_file() {
        vec![root.to_path_buf()]
    } else {
        discover_history_logs(root)
    };

    if log_files.is_empty() {
        return Err(Error::NoHistoryLogs(root.to_path_buf()));
    }

    let total_files = log_files.len();
    let processed_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    let results: Vec<LogResult> = log_files
        .into_par_iter()
        .filter_map(|path| {
            let result = process_log(&path, options);
            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

            match result {
                Ok(log_result) => {
                    if count % 100 == 0 || count == total_files {
                        eprintln!("Processed {}/{} logs...", count, total_files);
                    }
                    Some(log_result)
                }
                Err(e) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    eprintln!("Error processing {:?}: {}", path, e);
                    None
                }
            }
        })
        .collect();

    let errors = error_count.load(Ordering::Relaxed);
    if errors > 0 {
        eprintln!("Warning: {} logs failed to process", errors);
    }

    Ok(results)
}

/// Append (or overwrite) the training JSONL file with every example, in
/// emission order. Any write failure propagates; losing an example silently
/// would corrupt the dataset.
pub fn write_jsonl(results: &[LogResult], out_path: &Path, append: bool) -> Result<DistillStats> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = if append {
        File::options().create(true).append(true).open(out_path)?
    } else {
        File::create(out_path)?
    };
    let mut out = BufWriter::new(file);

    let mut total_entries = 0;
    let mut total_examples = 0;

    for result in results {
        total_entries += result.entries_read;
        for example in &result.examples {
            let line = serde_json::to_string(example)?;
            writeln!(out, "{}", line)?;
            total_examples += 1;
        }
    }

    out.flush()?;

    Ok(DistillStats {
        total_logs: results.len(),
        total_entries,
        total_examples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options() -> DistillOptions {
        DistillOptions {
            target_author: "bot".to_string(),
            replace_author: None,
            flush_trailing: false,
        }
    }

    fn write_log(path: &Path, entries: &[(&str, &str)]) {
        let json = serde_json::to_string(entries).unwrap();
        std::fs::write(path, json).unwrap();
    }

    #[test]
    fn test_discover_history_logs() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("guild")).unwrap();
        write_log(&temp.path().join("guild/general.history.json"), &[]);
        write_log(&temp.path().join("all.history.json"), &[]);
        std::fs::write(temp.path().join("notes.txt"), "skip me").unwrap();

        let files = discover_history_logs(temp.path());
        assert_eq!(files.len(), 2);
        // sorted by path
        assert!(files[0].ends_with("all.history.json"));
        assert!(files[1].ends_with("guild/general.history.json"));
    }

    #[test]
    fn test_process_log_end_to_end() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("all.history.json");
        write_log(
            &path,
            &[
                ("alice", "hi"),
                ("bot", "hello"),
                ("alice", "how are you"),
                ("bot", "good"),
                ("bot", "thanks"),
                ("carol", "bye"),
            ],
        );

        let result = process_log(&path, &options()).unwrap();
        assert_eq!(result.entries_read, 6);
        assert_eq!(result.examples.len(), 2);
        assert_eq!(result.examples[0].prompt, "alice: hi\nbot:");
        assert_eq!(result.examples[0].completion, " hello");
        assert_eq!(result.examples[1].prompt, "alice: how are you\nbot:");
        assert_eq!(result.examples[1].completion, " good\nthanks");
    }

    #[test]
    fn test_process_log_with_author_rename() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("all.history.json");
        write_log(
            &path,
            &[("alice", "hi gabor"), ("gabor", "hey"), ("alice", "bye")],
        );

        let opts = DistillOptions {
            replace_author: Some("gabor".to_string()),
            ..options()
        };
        let result = process_log(&path, &opts).unwrap();
        assert_eq!(result.examples.len(), 1);
        assert_eq!(result.examples[0].prompt, "alice: hi bot\nbot:");
        assert_eq!(result.examples[0].completion, " hey");
    }

    #[test]
    fn test_malformed_log_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, r#"{"not": "a log"}"#).unwrap();
        assert!(matches!(process_log(&path, &options()), Err(Error::Json(_))));
    }

    #[test]
    fn test_empty_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            process_all_logs(temp.path(), &options()),
            Err(Error::NoHistoryLogs(_))
        ));
    }

    #[test]
    fn test_write_jsonl_order_and_append() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("all.history.json");
        write_log(
            &log_path,
            &[("alice", "hi"), ("bot", "hello"), ("alice", "bye")],
        );
        let out_path = temp.path().join("train.jsonl");

        let results = process_all_logs(&log_path, &options()).unwrap();
        write_jsonl(&results, &out_path, true).unwrap();

        let body = std::fs::read_to_string(&out_path).unwrap();
        assert_eq!(
            body,
            "{\"prompt\":\"alice: hi\\nbot:\",\"completion\":\" hello\"}\n"
        );

        // A second append run doubles the file; each run's bytes are
        // identical on the same input.
        let results = process_all_logs(&log_path, &options()).unwrap();
        let stats = write_jsonl(&results, &out_path, true).unwrap();
        assert_eq!(stats.total_logs, 1);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.total_examples, 1);

        let body = std::fs::read_to_string(&out_path).unwrap();
        assert_eq!(body.lines().count(), 2);
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], lines[1]);

        // Overwrite mode resets the file.
        let results = process_all_logs(&log_path, &options()).unwrap();
        write_jsonl(&results, &out_path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&out_path).unwrap().lines().count(), 1);
    }
}
