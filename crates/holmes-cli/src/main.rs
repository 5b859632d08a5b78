use anyhow::Result;
use clap::Parser;
use holmes::{options, LogLevel, LoggerConfig, Rotation};
use std::fmt::Display;
use std::thread;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "CONFIGURATION:\n  Settings are layered: defaults, then the --config file, then HOLMES_* environment\n  variables (a .env file is read first), then command-line flags.\n\nEXIT STATUS:\n  Emitting at --emit fatal writes one record and exits with status 1."
)]
struct Cli {
    /// Messages to log
    #[arg(help = "Messages to log, one record each")]
    messages: Vec<String>,

    /// Configuration file path
    #[arg(long, help = "Path to a TOML logger configuration file")]
    config: Option<std::path::PathBuf>,

    /// Minimum level to emit
    #[arg(long, value_enum, help = "Set minimum log level")]
    level: Option<LevelArg>,

    /// Set log directory
    #[arg(long, help = "Directory for log files (stderr when unset)")]
    log_dir: Option<std::path::PathBuf>,

    /// Rotation period
    #[arg(long, value_enum, help = "Start a new log file every minute or hour")]
    rotate: Option<RotateMode>,

    /// Echo records to stdout
    #[arg(long, help = "Also write every record to stdout")]
    also_stdout: bool,

    /// Dump a backtrace on stop
    #[arg(long, help = "Write a stack backtrace into the log when stopping")]
    print_stack: bool,

    /// Level the messages are logged at
    #[arg(long, value_enum, default_value = "info", help = "Level to log messages at")]
    emit: LevelArg,

    /// Log all messages as a single concatenated record
    #[arg(long, help = "Concatenate the messages into one record")]
    concat: bool,

    /// Number of threads logging concurrently
    #[arg(long, default_value_t = 1, help = "Number of logging threads")]
    threads: usize,

    /// How many times each thread logs the messages
    #[arg(long, default_value_t = 1, help = "Repetitions per thread")]
    repeat: usize,

    /// Show the logger's own diagnostics on stderr
    #[arg(short, long, help = "Enable diagnostic output (also via RUST_LOG)")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Debug,
    Info,
    Warn,
    Error,
    #[value(help = "Logs one record, then exits with status 1")]
    Fatal,
}

impl From<LevelArg> for LogLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Debug => Self::Debug,
            LevelArg::Info => Self::Info,
            LevelArg::Warn => Self::Warn,
            LevelArg::Error => Self::Error,
            LevelArg::Fatal => Self::Fatal,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RotateMode {
    #[value(help = "Keep a single log file")]
    Never,
    #[value(help = "New log file at every minute boundary")]
    Minute,
    #[value(help = "New log file at every hour boundary")]
    Hour,
}

impl From<RotateMode> for Rotation {
    fn from(mode: RotateMode) -> Self {
        match mode {
            RotateMode::Never => Self::Never,
            RotateMode::Minute => Self::Minute,
            RotateMode::Hour => Self::Hour,
        }
    }
}

/// Create logger configuration from CLI arguments
fn create_logger_config(cli: &Cli) -> Result<LoggerConfig> {
    // Load base configuration from file, falling back to defaults
    let mut config = LoggerConfig::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load logger configuration: {}", e))?;

    config.load_env_overrides();

    // Apply CLI overrides
    if let Some(level) = cli.level {
        config.level = level.into();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(rotate) = cli.rotate {
        config.rotation = rotate.into();
    }
    if cli.also_stdout {
        config.also_stdout = true;
    }
    if cli.print_stack {
        config.print_stack = true;
    }

    debug!(
        holmes.event = "logger_config_created",
        level = %config.level.tag(),
        log_dir = ?config.log_dir,
        rotation = %config.rotation,
        also_stdout = config.also_stdout,
        print_stack = config.print_stack,
        "Logger configuration created"
    );

    Ok(config)
}

/// Route the logger's own `tracing` diagnostics to stderr
fn init_diagnostics(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("holmes=debug,holmes_cli=debug"),
        Err(_) => return,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log the messages from `cli.threads` threads, `cli.repeat` times each
fn emit_messages(cli: &Cli, logger: &holmes::LoggerHandle) {
    let level: LogLevel = cli.emit.into();

    thread::scope(|scope| {
        for _ in 0..cli.threads {
            scope.spawn(|| {
                for _ in 0..cli.repeat {
                    if cli.concat {
                        let parts: Vec<&dyn Display> =
                            cli.messages.iter().map(|m| m as &dyn Display).collect();
                        logger.log_concat(level, holmes::callsite!(), &parts);
                    } else {
                        for message in &cli.messages {
                            holmes::log!(level, "{}", message);
                        }
                    }
                }
            });
        }
    });
}

fn main() -> Result<()> {
    // Load environment variables before parsing configuration
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_diagnostics(cli.verbose);

    let config = create_logger_config(&cli)?;
    let logger = holmes::start([options::from_config(config)]);

    info!(
        holmes.event = "emitting",
        threads = cli.threads,
        repeat = cli.repeat,
        messages = cli.messages.len(),
        "Emitting messages"
    );
    emit_messages(&cli, &logger);

    logger.stop();
    Ok(())
}
