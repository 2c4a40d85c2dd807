use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use clipstash::capture::{self, CaptureOutcome};
use clipstash::config::AppPaths;
use clipstash::{clipboard, logging, Entry, HistoryError, HistoryStore};

const PREVIEW_MAX_CHARS: usize = 80;

#[derive(Parser)]
#[command(name = "clipstash", about = "Clipstash - clipboard history manager")]
struct Cli {
    /// Directory holding the history and error log
    #[arg(long, global = true, env = "CLIPSTASH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the current clipboard content
    Save,
    /// Keep saving new clipboard content until interrupted
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// List saved entries
    List,
    /// Print the number of saved entries
    Count,
    /// Print one entry in full
    Show {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Copy an entry back to the clipboard
    Copy {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Delete an entry
    Delete {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Delete all entries
    Clear,
    /// Export the history to a text file
    Export { path: PathBuf },
    /// Import entries from a text file
    Import { path: PathBuf },
}

/// Map a user-supplied position onto the history, rejecting negatives.
fn resolve_index(raw: i64, len: usize) -> Result<usize, HistoryError> {
    usize::try_from(raw)
        .ok()
        .filter(|&index| index < len)
        .ok_or(HistoryError::IndexOutOfRange { index: raw, len })
}

fn entry_at(store: &HistoryStore, raw: i64) -> Result<&Entry, HistoryError> {
    let index = resolve_index(raw, store.count())?;
    store.get(index).ok_or(HistoryError::IndexOutOfRange {
        index: raw,
        len: store.count(),
    })
}

fn print_entry(index: usize, entry: &Entry) {
    println!("{:>4}  {}", index, entry.preview(PREVIEW_MAX_CHARS));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve(cli.data_dir.as_deref())?;

    let _log_guard = match logging::init(&paths.error_log_file()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("failed to initialize error log, continuing without it: {:#}", e);
            None
        }
    };

    let mut store = HistoryStore::new(paths.history_file())?;
    if let Err(e) = store.load() {
        eprintln!("Failed to load clipboard history. Starting with an empty list. ({})", e);
    }

    match cli.command {
        Commands::Save => match capture::capture_clipboard(&mut store)? {
            CaptureOutcome::Added => println!("Saved. Total Items: {}", store.count()),
            CaptureOutcome::Duplicate => println!("Already in history."),
            CaptureOutcome::Empty => println!("Clipboard is empty."),
        },

        Commands::Watch { interval_ms } => {
            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("failed to listen for ctrl-c: {}", e);
                }
                on_signal.cancel();
            });

            println!("Auto-save enabled. Press Ctrl-C to stop.");
            capture::run_auto_save(
                &mut store,
                Duration::from_millis(interval_ms.max(1)),
                cancel,
                clipboard::read_clipboard,
            )
            .await?;
            println!("Total Items: {}", store.count());
        }

        Commands::List => {
            if store.is_empty() {
                println!("No clipboard history.");
            }
            for (index, entry) in store.entries().enumerate() {
                print_entry(index, entry);
            }
            println!("Total Items: {}", store.count());
        }

        Commands::Count => println!("{}", store.count()),

        Commands::Show { index } => {
            let entry = entry_at(&store, index)?;
            match entry.as_text() {
                Some(text) => println!("{}", text),
                None => println!("{}", entry.preview(PREVIEW_MAX_CHARS)),
            }
        }

        Commands::Copy { index } => {
            let entry = entry_at(&store, index)?;
            if cfg!(target_os = "linux") {
                println!(
                    "Holding entry {} on the clipboard until another program replaces it.",
                    index
                );
            }
            clipboard::write_entry(entry).context("failed to copy entry to clipboard")?;
            println!("Copied entry {}.", index);
        }

        Commands::Delete { index } => {
            let index = resolve_index(index, store.count())?;
            store.delete(index)?;
            info!("deleted entry {}", index);
            println!("Deleted. Total Items: {}", store.count());
        }

        Commands::Clear => {
            store.clear()?;
            println!("History cleared.");
        }

        Commands::Export { path } => {
            store.export(&path)?;
            println!("Clipboard history exported successfully to {}.", path.display());
        }

        Commands::Import { path } => {
            let summary = store.import(&path)?;
            println!(
                "Imported {} entries from {} ({} images skipped, {} duplicates skipped). Total Items: {}",
                summary.added,
                path.display(),
                summary.skipped_images,
                summary.skipped_duplicates,
                store.count()
            );
        }
    }

    Ok(())
}
