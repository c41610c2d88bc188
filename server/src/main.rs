#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Binary entry point for the community boss counter service.

use anyhow::Context;
use clap::Parser;
use dungeon_brawl_server::{build_router, AppState, BOSS_MAX_HP};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Serves the shared community boss counter over HTTP.
#[derive(Debug, Parser)]
#[command(name = "dungeon-brawl-server", version, about)]
struct Args {
    /// Address to bind the listener to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("boss counter listening on {addr} with {BOSS_MAX_HP} hit points");

    let router = build_router(AppState::default());
    axum::serve(listener, router)
        .await
        .context("server terminated unexpectedly")
}
