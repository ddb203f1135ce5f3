mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lingo_core::config::{self, LingoConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lingo",
    version,
    about = "Qt translation catalogs for the acquisition front end"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one phrase.
    Lookup {
        /// Target locale, e.g. ru_RU.
        #[arg(short, long, env = "LINGO_LOCALE")]
        locale: Option<String>,
        /// Translation context (UI component name).
        #[arg(long)]
        context: String,
        /// Disambiguation comment.
        #[arg(long)]
        comment: Option<String>,
        /// Source phrase.
        source: String,
    },
    /// List the source phrases of a context in catalog order.
    Sources {
        #[arg(short, long, env = "LINGO_LOCALE")]
        locale: Option<String>,
        #[arg(long)]
        context: String,
    },
    /// Report translation coverage of a locale.
    Audit {
        #[arg(short, long, env = "LINGO_LOCALE")]
        locale: Option<String>,
        /// Emit JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Validate a TS file against the schema rules.
    Check {
        path: PathBuf,
    },
    /// Rewrite a TS file in canonical form.
    Normalize {
        path: PathBuf,
        /// Write here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Format a value with a localized SI prefix.
    Si {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Unit appended after the prefix.
        #[arg(short, long, default_value = "")]
        suffix: String,
        /// Significant digits.
        #[arg(short, long, default_value_t = 3)]
        precision: usize,
        /// Fixed decimals instead of significant digits.
        #[arg(short, long)]
        decimals: Option<usize>,
        #[arg(short, long, env = "LINGO_LOCALE")]
        locale: Option<String>,
        /// Use the ASCII replacement for the micro sign.
        #[arg(long)]
        ascii: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_logging(&cfg.lingo)?;
    let catalog = &cfg.catalog;

    let output = match cli.command {
        Commands::Lookup {
            locale,
            context,
            comment,
            source,
        } => commands::handle_lookup(
            catalog,
            locale.as_deref(),
            &context,
            &source,
            comment.as_deref(),
        ),
        Commands::Sources { locale, context } => {
            commands::handle_sources(catalog, locale.as_deref(), &context)?
        }
        Commands::Audit { locale, json } => {
            commands::handle_audit(catalog, locale.as_deref(), json)?
        }
        Commands::Check { path } => commands::handle_check(catalog, &path)?,
        Commands::Normalize { path, output } => {
            commands::handle_normalize(catalog, &path, output.as_deref())?
        }
        Commands::Si {
            value,
            suffix,
            precision,
            decimals,
            locale,
            ascii,
        } => commands::handle_si(
            catalog,
            locale.as_deref(),
            value,
            &commands::SiStyle {
                suffix: &suffix,
                precision,
                decimals,
                ascii,
            },
        ),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_logging(cfg: &LingoConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    if cfg.log_file.trim().is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let path = PathBuf::from(config::shellexpand(&cfg.log_file));
    let Some(file_name) = path.file_name() else {
        anyhow::bail!("log_file has no file name: {}", path.display());
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}
