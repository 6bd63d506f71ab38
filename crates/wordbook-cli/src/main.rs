//! `wordbook`: vocabulary trainer on the command line.
//!
//! # Usage
//!
//! ```
//! wordbook add ubiquitous --group adjectives
//! wordbook practice 1 --direction source
//! wordbook answer 3 "It was everywhere."
//! wordbook serve --port 8080
//! ```
//!
//! Settings come from `wordbook.toml` (or `--config`) and `WORDBOOK_*`
//! environment variables; see [`settings::Settings`].

mod commands;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wordbook_ai::{AiGrader, CompletionClient};
use wordbook_core::direction::Direction;
use wordbook_service::Service;
use wordbook_store_sqlite::SqliteStore;

use settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wordbook", version, about = "Vocabulary trainer with AI-graded practice")]
struct Cli {
  /// Path to a TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "wordbook.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Translate text with DeepL without storing anything.
  Translate {
    text: String,
    /// Source language code; defaults to the configured source language.
    #[arg(long)]
    from: Option<String>,
    /// Target language code; defaults to the configured target language.
    #[arg(long)]
    to:   Option<String>,
  },
  /// Add a word, or update it if the term already exists.
  Add {
    term:        String,
    /// Translation to store; looked up with DeepL when omitted.
    #[arg(short, long)]
    translation: Option<String>,
    #[arg(short, long)]
    group:       Option<String>,
  },
  /// List words, newest first.
  List {
    /// Include words already marked as learned.
    #[arg(short, long)]
    all: bool,
  },
  /// List group labels.
  Groups,
  /// Show a word with its examples and exercises.
  Show { id: i64 },
  /// Replace a word's notes.
  Note { id: i64, notes: String },
  /// Set a word's group; omit the label to clear it.
  Group { id: i64, group: Option<String> },
  /// Mark or unmark a word as learned.
  Learned(LearnedArgs),
  /// Log a sentence for a word by hand.
  Example { id: i64, text: String },
  /// Generate a practice sentence for a word.
  Practice {
    id:        i64,
    /// `target` for a sentence in the target language, `source` for one in
    /// the source language.
    #[arg(short, long, default_value = "target")]
    direction: Direction,
  },
  /// Answer a practice exercise and get it graded.
  Answer { exercise: i64, answer: String },
  /// Delete a word with its examples and exercises.
  Delete { id: i64 },
  /// Serve the JSON API.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

#[derive(Args, Debug)]
struct LearnedArgs {
  id:  i64,
  #[arg(long, conflicts_with = "off", required_unless_present = "off")]
  on:  bool,
  #[arg(long)]
  off: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

type AppService = Service<SqliteStore, AiGrader<CompletionClient>>;

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so command output stays clean.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store_path = settings.store_path();
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let completion =
    CompletionClient::new(settings.completion()).context("failed to build completion client")?;
  let mut grader = AiGrader::new(completion, settings.languages());
  if let Some(language) = settings.feedback_language() {
    grader = grader.with_feedback_language(language);
  }
  if let Some(label) = &settings.suggestion_label {
    grader = grader.with_suggestion_label(label);
  }

  let service = Arc::new(Service::new(store, grader));
  commands::run(cli.command, &settings, service).await
}
