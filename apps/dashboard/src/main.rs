use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{DashboardClient, HttpUserService, MirrorPolicy};
use shared::domain::{SortDirection, SortKey};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod shell;

#[derive(Parser, Debug)]
#[command(about = "Browse and edit the user directory from a terminal")]
struct Args {
    /// Users collection endpoint; overrides the config file and environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// `local_authoritative` or `rollback`.
    #[arg(long)]
    mirror_policy: Option<MirrorPolicy>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (the default).
    Shell,
    /// Print one page and exit.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        sort: Option<SortKey>,
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        settings.api_url = url;
    }
    if let Some(policy) = args.mirror_policy {
        settings.mirror_policy = policy;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let api_url = config::normalize_api_url(&settings.api_url)?;
    let service = HttpUserService::with_timeout(
        api_url.clone(),
        Duration::from_secs(settings.request_timeout_secs),
    )
    .map_err(|err| anyhow!("failed to build http client: {err}"))?;
    let client = DashboardClient::new(Arc::new(service), settings.mirror_policy);
    info!(%api_url, policy = ?client.policy(), "dashboard starting");

    if let Err(err) = client.load_users().await {
        warn!(error = %err, "initial load failed");
    }

    match args.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            shell::run(&client, stdin, &mut std::io::stdout()).await?;
        }
        Command::List {
            search,
            sort,
            desc,
            page,
        } => {
            client.set_search(search).await;
            if let Some(key) = sort {
                let direction = if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                client.set_sort(key, direction).await;
            }
            client.set_page(page).await;
            print!("{}", render::render(&client.snapshot().await));
        }
    }
    Ok(())
}
