//! Command-line interface parsing and handling
//!
//! This module parses arguments, sets up tracing, resolves settings, and
//! dispatches to the full-screen chat, the line mode, or config printing.

pub mod plain;

use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::cli::plain::run_plain;
use crate::core::config::{path_display, Config, Overrides, Settings, API_KEY_ENV};
use crate::ui::chat_loop::run_chat;

const DEFAULT_TRACE_FILTER: &str = "bankchat=warn";

#[derive(Parser)]
#[command(name = "bankchat")]
#[command(version, about = "A terminal banking assistant backed by an OpenAI-compatible API")]
#[command(
    long_about = "bankchat is a terminal chat client for a banking assistant. The first four \
replies come from a fixed script; every later message is answered by the configured model.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    API key sent as a bearer token\n\
  OPENAI_BASE_URL   API base URL (defaults to https://api.openai.com/v1)\n\
  BANKCHAT_MODEL    Model identifier (defaults to gpt-4o)\n\
  BANKCHAT_CONFIG   Path to config.toml (defaults to the platform config directory)\n\
  RUST_LOG          Diagnostic filter (defaults to bankchat=warn)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Up/Down           Scroll the conversation\n\
  PageUp/PageDown   Scroll by ten rows\n\
  Ctrl+C, Esc       Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for live replies
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// API base URL, e.g. http://localhost:11434/v1
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Append the transcript to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write diagnostics to this file instead of stderr (the chat screen discards them otherwise)
    #[arg(long, global = true, value_name = "FILE")]
    pub trace_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the full-screen chat (default)
    Chat,
    /// Read messages from stdin, one per line, and print each reply
    Plain,
    /// Print the resolved configuration
    Config,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            log_file: self.log.clone(),
        }
    }
}

fn trace_writer(
    command: &Commands,
    trace_file: Option<&PathBuf>,
) -> Result<(BoxMakeWriter, bool), Box<dyn Error>> {
    if let Some(path) = trace_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        return Ok((BoxMakeWriter::new(Mutex::new(file)), false));
    }

    match command {
        // stderr would scribble over the alternate screen
        Commands::Chat => Ok((BoxMakeWriter::new(std::io::sink), false)),
        Commands::Plain | Commands::Config => Ok((BoxMakeWriter::new(std::io::stderr), true)),
    }
}

fn init_tracing(writer: BoxMakeWriter, ansi: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init();
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.as_ref().unwrap_or(&Commands::Chat);

    let (writer, ansi) = trace_writer(command, args.trace_file.as_ref())?;
    init_tracing(writer, ansi);

    let config = Config::load()?;
    let settings = Settings::resolve(&config, &args.overrides());
    if !settings.has_api_key() {
        warn!("{API_KEY_ENV} is not set; live replies will be sent without credentials");
    }

    match command {
        Commands::Chat => run_chat(settings).await,
        Commands::Plain => run_plain(settings).await,
        Commands::Config => {
            match Config::config_path() {
                Ok(path) => println!("config file: {}", path_display(path)),
                Err(err) => println!("config file: ({err})"),
            }
            settings.print_all();
            Ok(())
        }
    }
}
