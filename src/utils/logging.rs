use std::{path::Path, sync::LazyLock};

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";

const KEPT_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "info";

/// Where the cli writes its logs.
#[derive(Debug, Clone, Copy)]
pub struct LogOptions<'a> {
    /// File name prefix of the rotated files.
    pub prefix: &'a str,
    pub dir: &'a Path,
    /// Overrides `RUST_LOG` when set.
    pub level: Option<LevelFilter>,
    /// Also print log lines to stdout.
    pub echo: bool,
}

impl<'a> LogOptions<'a> {
    pub fn cli(dir: &'a Path, verbose: bool) -> Self {
        Self {
            prefix: CLI_PREFIX,
            dir,
            level: verbose.then_some(LevelFilter::TRACE),
            echo: verbose,
        }
    }
}

/// Directive limiting output to this crate. An explicit level wins over `env_level`.
fn crate_directive(level: Option<LevelFilter>, env_level: Option<&str>) -> String {
    let level = match (level, env_level.map(str::trim)) {
        (Some(level), _) => level.to_string().to_lowercase(),
        (None, Some(env)) if !env.is_empty() => env.to_string(),
        _ => DEFAULT_LEVEL.to_string(),
    };
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// Logs always go into daily rotated files, stdout only gets them when `echo` is set.
pub fn enable_logging(options: LogOptions) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(options.prefix)
        .filename_suffix("log")
        .build(options.dir)
        .with_context(|| format!("Failed to open log directory {:?}", options.dir))?;

    let echo = options.echo;
    let stdout = std::io::stdout.with_filter(move |_| echo);
    let env_level = std::env::var("RUST_LOG").ok();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::new(crate_directive(
            options.level,
            env_level.as_deref(),
        )))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging {e}"))?;
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});
