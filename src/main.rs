mod config;
mod envelope;
mod errors;
mod files;
mod logging;
mod security;
mod server;

use crate::config::{Config, Overrides};
use crate::files::{FileRepository, WorkingDir};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "fileserver", about = "Serve a working directory's files over HTTP")]
struct Cli {
    /// Working directory (created when missing)
    #[arg(short, long)]
    directory: Option<PathBuf>,
    /// Log level or tracing filter directive
    #[arg(short = 'l', long)]
    loglevel: Option<String>,
    /// Also append logs to this file
    #[arg(short = 'f', long)]
    logfile: Option<PathBuf>,
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(long)]
    bind: Option<String>,
    /// Config file (TOML, or JSON by extension); defaults to ./fileserver.toml if present
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref()).context("loading config")?;
    cfg.apply_env(std::env::vars()).context("reading environment")?;
    cfg.apply_overrides(Overrides {
        directory: cli.directory,
        bind_addr: cli.bind,
        port: cli.port,
        log_level: cli.loglevel,
        log_file: cli.logfile,
    });
    cfg.validate().context("validating config")?;

    let _log_guard = logging::init(&cfg.logging)?;

    let workdir = Arc::new(WorkingDir::from_process().context("reading launch directory")?);
    if let Some(dir) = &cfg.storage.directory {
        let repo = FileRepository::new(workdir.clone());
        repo.change_dir(&dir.to_string_lossy(), true)
            .with_context(|| format!("switching to {}", dir.display()))?;
    }

    info!(addr = %cfg.addr()?, directory = %workdir.get().display(), "fileserver ready");
    server::serve(server::AppState::new(cfg, workdir)).await
}
