//! Search resolution service for the pathway knowledgebase.

pub mod api;
pub mod config;
pub mod db_utils;
pub mod error;
pub mod server_extra;

pub use error::{Error, Result};

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::server_extra::state::AppState;

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: PathBuf,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = config::load(&args.config)?;
    init_tracing(&config);
    let http_addr: SocketAddr = config.service.http_bind.parse()?;

    let state = AppState::new(&config)?;
    let app = server_extra::router(state);

    let listener = TcpListener::bind(http_addr).await?;
    tracing::info!(%http_addr, solr = %config.solr.url, "HTTP server listening.");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
