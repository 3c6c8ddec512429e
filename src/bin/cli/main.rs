mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use flashdeck_lib::config::AppConfig;

const LOG_FILE_NAME: &str = "flashdeck.log";

#[derive(Parser)]
#[command(name = "flashdeck", about = "Flashcard trainer with AI-generated cards", version)]
struct Cli {
    /// Config file (default: <config dir>/flashdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding flashcards.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List every card in the deck
    List,

    /// Show the cards you struggle with most
    Weak {
        /// Maximum cards to show
        #[arg(long, default_value = "5")]
        count: usize,
    },

    /// Generate cards for a new topic, or more cards for the current deck
    Generate {
        /// Start a fresh deck on this topic (replaces existing cards)
        #[arg(long)]
        topic: Option<String>,
        /// Number of cards to request (default from config)
        #[arg(long, value_parser = parse_card_count)]
        count: Option<usize>,
    },

    /// Delete all cards and the topic
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Launch interactive TUI
    #[cfg(feature = "tui")]
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config.resolve_data_dir().context("Failed to get data directory")?,
    };

    let interactive = match &cli.command {
        None => true,
        #[cfg(feature = "tui")]
        Some(Command::Tui) => true,
        Some(_) => false,
    };
    init_logging(interactive.then(|| data_dir.join(LOG_FILE_NAME)).as_deref());

    let mut app = app::App::new(config, data_dir)?;

    match cli.command {
        None => {
            #[cfg(feature = "tui")]
            {
                tui::run(app)?;
            }
            #[cfg(not(feature = "tui"))]
            {
                let _ = app;
                eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        Some(Command::List) => {
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Some(Command::Weak { count }) => {
            commands::weak::run(&app, count, &cli.format, use_color)?;
        }
        Some(Command::Generate { topic, count }) => {
            commands::generate::run(&mut app, topic.as_deref(), count, &cli.format, use_color)?;
        }
        Some(Command::Clear { yes }) => {
            commands::clear::run(&mut app, yes, &cli.format)?;
        }
        #[cfg(feature = "tui")]
        Some(Command::Tui) => {
            tui::run(app)?;
        }
    }

    Ok(())
}

/// Card counts must be positive
fn parse_card_count(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Set up env_logger, writing to `log_file` when given
///
/// The TUI owns the terminal, so its logs go to a file instead of stderr.
fn init_logging(log_file: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Cannot open log file {}: {}", path.display(), e);
            }
        }
    }

    builder.init();
}
