use clap::Parser;
use seatmarket_cli::cli::Cli;
use seatmarket_cli::config::Config;
use seatmarket_store::{JsonFileStore, SeatStore};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env().with_data_path(cli.data.clone());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::debug!(path = %config.data_path.display(), "Opening board");
    let mut store = SeatStore::open(JsonFileStore::open(&config.data_path));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    seatmarket_cli::run(cli.command, &mut store, &mut out)
}
