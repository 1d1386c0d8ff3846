//! CLI for distilling a chat bot's conversation history into training data,
//! and for poking at the bot's runtime tuning knobs offline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::Rng;

use chat_distill_core::{
    build_context, build_prompt, process_all_logs, read_history_log, reply_chance, should_reply,
    write_jsonl, BotConfig, DistillOptions,
};

#[derive(Parser, Debug)]
#[command(name = "chat-distill")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn history logs into a prompt/completion JSONL training file.
    Distill {
        /// History log file, or a directory of .json history logs
        #[arg(long)]
        history: PathBuf,

        /// Output JSONL path
        #[arg(long, default_value = "train.jsonl")]
        out: PathBuf,

        /// Author whose messages become completions
        #[arg(long)]
        target_author: String,

        /// Rewrite this author's identity to the target author first
        #[arg(long)]
        replace_author: Option<String>,

        /// Also emit a turn left open at the end of a log
        #[arg(long)]
        flush_trailing: bool,

        /// Overwrite the output file instead of appending to it
        #[arg(long)]
        no_append: bool,
    },

    /// Print the reply chance for a given idle time and draw a decision.
    Chance {
        /// Hours since the bot last posted
        #[arg(long)]
        hours: f64,

        /// Treat the triggering message as a mention
        #[arg(long)]
        mentioned: bool,

        /// Config file with the tuning knobs
        #[arg(long, default_value = "fileconst.json")]
        config: PathBuf,
    },

    /// Show or update the persisted tuning knobs.
    Config {
        /// Config file path
        #[arg(long, default_value = "fileconst.json")]
        file: PathBuf,

        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the exact prompt the bot would send for a history log.
    Preview {
        /// History log file
        #[arg(long)]
        history: PathBuf,

        /// Config file with the tuning knobs
        #[arg(long, default_value = "fileconst.json")]
        config: PathBuf,

        /// Instruction text placed ahead of the context window
        #[arg(long, default_value = "")]
        prefix: String,

        /// Name used for the completion cue line
        #[arg(long)]
        bot_name: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the current values.
    Show,
    /// Set a key to a new value and persist the file.
    Set { key: String, value: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Command::Distill {
            history,
            out,
            target_author,
            replace_author,
            flush_trailing,
            no_append,
        } => {
            let options = DistillOptions {
                target_author: target_author.clone(),
                replace_author: replace_author.clone(),
                flush_trailing,
            };

            println!("Processing history logs from {:?}...", history);
            let results = process_all_logs(&history, &options)?;
            let stats = write_jsonl(&results, &out, !no_append)?;

            let metadata_path = out.with_extension("meta.json");
            let metadata = serde_json::json!({
                "config": {
                    "history": history.to_string_lossy(),
                    "out": out.to_string_lossy(),
                    "target_author": target_author,
                    "replace_author": replace_author,
                    "flush_trailing": flush_trailing,
                },
                "counts": {
                    "total_logs": stats.total_logs,
                    "total_entries": stats.total_entries,
                    "total_examples": stats.total_examples,
                },
            });
            std::fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

            println!("\n[summary]");
            println!("  Logs processed: {}", stats.total_logs);
            println!("  Entries read: {}", stats.total_entries);
            println!("  Examples written: {}", stats.total_examples);
            println!("  Output: {:?}", out);
            println!("  Metadata: {:?}", metadata_path);
        }

        Command::Chance {
            hours,
            mentioned,
            config,
        } => {
            let config = BotConfig::load_or_default(&config)?;
            let chance = reply_chance(hours, &config);
            let sample: f64 = rand::thread_rng().gen();
            let result = should_reply(mentioned, hours, &config, sample);
            println!("chance: {}, sample: {}, result: {}", chance, sample, result);
        }

        Command::Config { file, action } => match action {
            ConfigAction::Show => {
                let config = BotConfig::load_or_default(&file)?;
                println!("{}", config.describe());
            }
            ConfigAction::Set { key, value } => {
                let mut config = BotConfig::load_or_default(&file)?;
                config.set(&key, &value)?;
                config.save(&file)?;
                println!("{} set to {}", key, value);
            }
        },

        Command::Preview {
            history,
            config,
            prefix,
            bot_name,
        } => {
            let config = BotConfig::load_or_default(&config)?;
            let entries = read_history_log(&history)?;
            let context = build_context(&entries, config.context_count);
            let prompt = build_prompt(&prefix, &context, &bot_name);
            println!("----------\nSending prompt:\n\n{}\n----------", prompt);
        }
    }

    Ok(())
}
