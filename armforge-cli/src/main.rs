use armforge_cli::Cli;
use clap::Parser;
use tracing_subscriber::{
    self,
    filter::{filter_fn, LevelFilter},
    prelude::*,
    Layer,
};

mod armforge_cli;

fn init_logging(dev: bool, verbosity: u8) {
    let log_level = match (dev, verbosity) {
        (true, _) => LevelFilter::TRACE,
        (_, 0) => LevelFilter::WARN,
        (_, 1) => LevelFilter::INFO,
        (_, 2) => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Our own targets follow the verbosity switch; everything else stays
    // at WARN.
    let layer = tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_target(false)
        .without_time()
        .with_filter(filter_fn(move |metadata| {
            if metadata.target().starts_with("armforge") {
                metadata.level() <= &log_level
            } else {
                metadata.level() <= &LevelFilter::WARN
            }
        }));
    tracing_subscriber::registry().with(layer).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.dev, cli.verbosity);

    cli.run().await?;

    Ok(())
}
