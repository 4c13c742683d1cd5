#[macro_use]
mod ui;
mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(
    name = "mdloc",
    version,
    about = "Markdown translation round-trip: extract documents into one bundle, apply the translated bundle back"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only warnings and errors on the console log
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Collect every document under the content directories into one bundle
    Extract {
        /// Project root (default: `root` from mdloc.toml, else the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Bundle to write, relative to the root
        #[arg(long)]
        out: Option<PathBuf>,
        /// Content directory to walk; repeat for several (default: docs, blog)
        #[arg(long = "dir")]
        dirs: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write the documents of a translated bundle back into the project
    Apply {
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Translated bundle to read, relative to the root
        #[arg(long)]
        bundle: Option<PathBuf>,
        /// Write into the locale tree for this code instead of over the originals
        #[arg(long)]
        locale: Option<String>,
        /// Overwrite originals without keeping `<file>.backup`
        #[arg(long, default_value_t = false)]
        no_backup: bool,
        /// Skip files whose content would not change
        #[arg(long, default_value_t = false)]
        incremental: bool,
        /// Show where each document would go; write nothing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Do not ask for confirmation
        #[arg(short, long, default_value_t = false)]
        yes: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the documents `extract` would pick up
    Scan {
        #[arg(short, long)]
        root: Option<PathBuf>,
        #[arg(long = "dir")]
        dirs: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Parse a bundle and report structural problems
    Check {
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Bundle to check (default: the translated bundle `apply` reads)
        #[arg(long)]
        bundle: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Dump JSON schemas of the machine-readable reports
    Schema {
        #[arg(long, default_value = "./schemas")]
        out_dir: PathBuf,
    },
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        tracing::debug!(event = "command_start", cmd = ?self);

        match self {
            Commands::Extract {
                root,
                out,
                dirs,
                format,
            } => commands::extract::run_extract(root, out, dirs, format),

            Commands::Apply {
                root,
                bundle,
                locale,
                no_backup,
                incremental,
                dry_run,
                yes,
                format,
            } => commands::apply::run_apply(
                root,
                bundle,
                locale,
                no_backup,
                incremental,
                dry_run,
                yes,
                format,
                use_color,
            ),

            Commands::Scan { root, dirs, format } => {
                commands::scan::run_scan(root, dirs, format, use_color)
            }

            Commands::Check {
                root,
                bundle,
                format,
            } => commands::check::run_check(root, bundle, format),

            Commands::Schema { out_dir } => commands::schema::run_schema(out_dir),
        }
    }
}

/// Console layer on stderr, debug-level file layer under `logs/`. The returned
/// guard flushes the file writer and must live until exit.
fn init_tracing(quiet: bool) -> WorkerGuard {
    let file_appender = rolling::daily("logs", "mdloc.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.quiet);

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
