use anyhow::Context;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Interactive manager/project/task tracker.
#[derive(Parser, Debug, Clone)]
#[command(name = "tasktree", version)]
#[command(about = "Keep managers, projects and tasks in memory from a text menu", long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print messages without colors
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

impl Cli {
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

pub fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(cli.env_filter())
        .with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file `{}`", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))
        }
        None => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow::anyhow!("failed to install logger: {err}")),
    }
}
