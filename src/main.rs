//! chat-cells - render and preview chat message cells in the terminal

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chat_cells::config::Config;
use chat_cells::models::{load_transcript, mock, ChatMessage};
use chat_cells::tui::{self, log_capture::LogBuffer, TerminalPlatform, TranscriptState};

#[derive(Parser)]
#[command(name = "chat-cells")]
#[command(about = "Render and preview chat message cells in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a transcript interactively
    Preview {
        /// JSON transcript to load (built-in sample when omitted)
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },

    /// Print a transcript as painted cells
    Render {
        /// JSON transcript to load (built-in sample when omitted)
        #[arg(short, long)]
        transcript: Option<PathBuf>,

        /// Output width in columns
        #[arg(short, long, default_value = "72")]
        width: usize,
    },

    /// Show the configuration file path and effective settings
    Config,
}

fn init_logging(verbose: bool, capture: Option<LogBuffer>) {
    let filter = if verbose { "debug" } else { "info" };
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()));

    // The preview owns the terminal, so its logs go to the in-app pane.
    match capture {
        Some(buffer) => registry
            .with(fmt::layer().with_target(false).with_ansi(false).with_writer(buffer))
            .init(),
        None => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}

/// Load the transcript at `path`, or the built-in sample.
fn load_messages(path: Option<&Path>) -> Result<(String, Vec<ChatMessage>)> {
    match path {
        Some(path) => {
            let messages = load_transcript(path)?;
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Ok((name, messages))
        }
        None => {
            let messages = mock::mock_transcript().context("Built-in transcript is invalid")?;
            Ok(("sample transcript".to_string(), messages))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let capture = matches!(cli.command, Commands::Preview { .. }).then(LogBuffer::new);
    init_logging(cli.verbose, capture.clone());

    let config = Config::load()?;

    match cli.command {
        Commands::Preview { transcript } => {
            let (name, messages) = load_messages(transcript.as_deref())?;
            tracing::info!("Loaded {} messages", messages.len());
            tui::run(
                TranscriptState::new(name, messages),
                &config,
                capture.unwrap_or_default(),
            )?;
        }
        Commands::Render { transcript, width } => {
            let (_, messages) = load_messages(transcript.as_deref())?;
            let (platform, _notices) = TerminalPlatform::new(config.opener());
            tui::print_transcript(&messages, &config.render_context(), &platform, width)?;
        }
        Commands::Config => {
            println!("# {}", Config::config_path()?.display());
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
