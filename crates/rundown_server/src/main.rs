mod auth;
mod config;
mod routes;
mod server;
mod views;

use anyhow::Context;
use auth::Credentials;
use clap::Parser;
use config::Args;
use log::info;
use rundown_core::{init_logging, FileRepository, RngSource, RundownRepository, RundownService};
use server::App;
use std::sync::Arc;

/// Opens the dataset file and wires the request handler around it.
fn build_app(args: &Args) -> anyhow::Result<App<FileRepository>> {
    let rng = match args.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let repo = FileRepository::open_with_rng(&args.filename, rng)
        .with_context(|| format!("failed to load {}", args.filename.display()))?;
    info!(
        "event=repo_open module=main status=ok path={} episodes={}",
        repo.path().display(),
        repo.episode_list().len()
    );
    Ok(App::new(
        RundownService::new(repo),
        Credentials::new(args.user.clone(), args.pass.clone()),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;
    info!(
        "event=startup module=main status=ok version={} seeded={}",
        rundown_core::core_version(),
        args.seed.is_some()
    );

    let app = Arc::new(build_app(&args)?);
    server::run(app, args.listen_addr())
        .await
        .context("server stopped")
}
