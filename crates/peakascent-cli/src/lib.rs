mod command;
pub use command::{Command, RelatedCommand, WhatIfCommand};

mod config;
pub use config::Config;

use anyhow::{bail, Result};
use clap::Parser;
use peakascent::{Database, NormalTable, Table};
use std::io::Write;

/// Command line front end over an open project.
pub struct PeakAscentCli {
    db: Database,
}

#[derive(Parser, Debug)]
#[command(name = "peakascent")]
#[command(about = "Inspect PeakAscentLogger project files")]
#[command(version)]
pub struct Cli {
    /// Project to open, e.g. `sqlite:ascents.db`
    pub url: String,

    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

impl PeakAscentCli {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens the project `cli` names.
    pub fn open(cli: &Cli) -> Result<Self> {
        let db = Database::builder()
            .url(&cli.url)
            .config(cli.config.engine())
            .create_schema(cli.config.create)
            .build_with_progress(|progress| {
                tracing::debug!(
                    table = ?progress.table,
                    loaded = progress.loaded,
                    total = progress.total,
                    "loading"
                );
            })?;

        Ok(Self::new(db))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Runs `command`, writing its report to `out`.
    pub fn run(&mut self, command: &Command, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::Summary => command::summary(&self.db, out),
            Command::Related(related) => related.run(&self.db, out),
            Command::WhatIf(what_if) => what_if.run(&mut self.db, out),
        }
    }
}

/// Looks up a normal table by name, ignoring case.
fn normal_table<'a>(db: &'a Database, name: &str) -> Result<&'a NormalTable> {
    let Some(table) = db.table_by_name(name) else {
        bail!("no table named `{name}`");
    };

    match table.as_normal() {
        Some(normal) if !normal.def().meta => Ok(normal),
        _ => bail!("`{}` does not hold items", table.name()),
    }
}
