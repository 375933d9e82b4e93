use anyhow::Context;
use clap::Parser;
use linedit::file::{FsStorage, HistoryStore};
use linedit::logging::{self, LogLevel, Logger};
use linedit::options::{OptionOverrides, SessionOptions};
use linedit::{error, App, CommandSession};
use std::path::PathBuf;

/// Menu-driven line editor with undo/redo history
#[derive(Debug, Parser)]
#[command(name = "linedit", version, about)]
struct Args {
    /// JSON config file (defaults to ~/.linedit/config.json when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where the edit history is written on exit
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Skip timestamped backups before overwriting
    #[arg(long)]
    no_backup: bool,

    /// Also write log output to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the saved edit history and exit
    #[arg(long)]
    show_history: bool,
}

impl Args {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            history_path: self.history.clone(),
            backups: self.no_backup.then_some(false),
            log_path: self.log_file.clone(),
            log_level: self.verbose.then_some(LogLevel::Debug),
        }
    }
}

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();
    let args = Args::parse();

    let options = SessionOptions::resolve(args.config.as_deref(), &args.overrides())
        .context("failed to load settings")?;
    init_logging(&options)?;
    log::debug!("resolved options: {:?}", options);

    if args.show_history {
        return show_history(&options);
    }

    let session = CommandSession::with_options(FsStorage, &options);
    let stdin = std::io::stdin();
    let mut app = App::new(session, stdin.lock(), std::io::stdout());
    app.run().context("editor session failed")?;

    Ok(())
}

fn init_logging(options: &SessionOptions) -> anyhow::Result<()> {
    let mut logger = Logger::new(options.log_level);
    if let Some(path) = &options.log_path {
        logger = logger.with_file_output(path.clone());
    }
    logging::init(logger).context("failed to install logger")
}

fn show_history(options: &SessionOptions) -> anyhow::Result<()> {
    let store = HistoryStore::new(options.history_path.clone());
    let record = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;

    println!("Session started: {}", record.session);
    if let Some(file) = &record.file {
        println!("File: {}", file.display());
    }
    for (index, entry) in record.entries.iter().enumerate() {
        println!(
            "--- #{} {} ---",
            index + 1,
            entry.timestamp().format(linedit::editor::history::TIMESTAMP_FORMAT)
        );
        print!("{}", entry.content());
    }
    Ok(())
}
