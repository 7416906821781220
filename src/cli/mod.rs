pub mod error;
pub mod utils;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::session::{
    Config, ConsoleSink, FileSink, LOG_TARGET, Session, SessionLog, get_log_path,
};
use crate::sync::{DEFAULT_PROGRAM, RealRsync, parse_options_text};
use crate::workflow::{TerminalPrompter, Workflow, WorkflowOptions};
use error::{CliError, CliResult};

#[derive(Parser, Debug)]
#[command(name = "arxive")]
#[command(author, version, about = "Mirror a directory with rsync, confirming deletions first", long_about = None)]
pub struct Cli {
    /// Source directory (default: configured source)
    pub source: Option<String>,

    /// Destination directory (default: configured destination)
    pub destination: Option<String>,

    /// "true" answers every prompt with delete all / proceed
    pub unattended: Option<String>,

    /// Configuration file (default: $XDG_CONFIG_HOME/arxive or ~/.config/arxive)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Session log file (default: session.log in the installation directory)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// rsync binary to run
    #[arg(long, env = "ARXIVE_RSYNC", default_value = DEFAULT_PROGRAM)]
    pub rsync: String,

    /// Extra rsync options, comma separated (e.g. "--progress, -l")
    #[arg(long, allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Store source, destination and options as the new defaults
    #[arg(long)]
    pub save_config: bool,

    /// Exit with an error when rsync fails instead of only reporting it
    #[arg(long)]
    pub abort_on_sync_failure: bool,
}

impl Cli {
    pub fn is_unattended(&self) -> bool {
        self.unattended.as_deref() == Some("true")
    }
}

/// Initialize tracing subscriber with env filter
///
/// Session log entries already reach the terminal, so their mirrored
/// events are off unless RUST_LOG asks for them.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("arxive=warn,{}=off", LOG_TARGET).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Merge command-line values over the configuration.
pub fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(source) = cli.source.as_deref().filter(|s| !s.is_empty()) {
        config.source = source.to_string();
    }
    if let Some(destination) = cli.destination.as_deref().filter(|s| !s.is_empty()) {
        config.destination = destination.to_string();
    }
    if let Some(text) = &cli.options {
        config.options = Some(parse_options_text(text).options).filter(|o| !o.is_empty());
    }
    config.abort_on_sync_failure |= cli.abort_on_sync_failure;
}

pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing();

    let log_path = cli.log.clone().unwrap_or_else(get_log_path);
    let file_sink = match FileSink::open(&log_path) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Goodbye!");
            return Err(e.into());
        }
    };
    let mut log = SessionLog::new().with_sink(ConsoleSink).with_sink(file_sink);
    log.info("Session log created.");

    let loaded = cli
        .config
        .clone()
        .map(Ok)
        .unwrap_or_else(Config::default_path)
        .and_then(|path| Config::load(&path).map(|config| (path, config)));
    let (config_path, mut config) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            log.error_detail("Error while loading configurations!", &e);
            log.info("Goodbye!");
            return Err(e.into());
        }
    };
    log.info("Configurations loaded.");

    apply_overrides(&cli, &mut config);

    if cli.save_config {
        if let Err(e) = config.save(&config_path) {
            log.error_detail("Error while saving configurations!", &e);
            log.info("Goodbye!");
            return Err(e.into());
        }
        log.success("Configurations saved.");
    }

    let mut session = Session::new(log);
    session.source = config.source.clone();
    session.destination = config.destination.clone();
    session.options = config.options().to_vec();

    let options = WorkflowOptions {
        unattended: cli.is_unattended(),
        abort_on_sync_failure: config.abort_on_sync_failure,
    };
    let mut workflow = Workflow::new(
        RealRsync::with_program(cli.rsync.clone()),
        TerminalPrompter::stdio(),
        options,
    );

    let result = workflow.run(&mut session);
    if let Ok(outcome) = &result {
        println!("\n{}", utils::summary_table(outcome));
    }
    session.log.info("Goodbye!");
    result.map(|_| ()).map_err(CliError::from)
}
