use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mta_server::config::ServerConfig;
use mta_server::server::run_server;

/// Bob-side MtA share-conversion server.
#[derive(Parser, Debug)]
#[command(name = "mta-server")]
struct Cli {
    /// TCP port to listen on
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,

    /// Bob's multiplicative share; a fresh random value when omitted
    y_share: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::try_parse().unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });

    let config = ServerConfig::new(cli.port, cli.y_share);
    info!(
        port = config.port,
        y_share = config.y_share,
        "starting MtA server"
    );

    run_server(config).await
}
