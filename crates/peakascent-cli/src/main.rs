use anyhow::Result;
use clap::Parser;
use peakascent_cli::{Cli, PeakAscentCli};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PEAKASCENT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut app = PeakAscentCli::open(&cli)?;
    app.run(&cli.command, &mut std::io::stdout().lock())
}
