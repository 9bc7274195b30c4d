use crate::normal_table;

use anyhow::{bail, Result};
use clap::Args;
use peakascent::{db::DeleteEffect, Database, Table, ValidItemId};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct WhatIfCommand {
    /// Table to delete from
    pub table: String,

    /// Primary keys of the items to delete
    #[arg(required = true)]
    pub ids: Vec<i64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Carry out the deletion after reporting
    #[arg(long)]
    pub apply: bool,
}

/// One line of the report.
#[derive(Debug, Serialize)]
struct Impact<'a> {
    table: &'a str,
    column: &'a str,
    effect: &'static str,
    rows: usize,
}

impl WhatIfCommand {
    pub(crate) fn run(&self, db: &mut Database, out: &mut dyn Write) -> Result<()> {
        let table = normal_table(db, &self.table)?.id();

        let mut keys = vec![];
        for id in &self.ids {
            match ValidItemId::try_new(*id) {
                Some(key) => keys.push(key),
                None => bail!("{id} is not a valid ID"),
            }
        }

        let results = if self.apply {
            db.change_data(|db| db.remove_rows(table, &keys))?
        } else {
            db.what_if_remove_rows(table, &keys)
        };

        let schema = db.schema();
        let impacts = results
            .iter()
            .map(|result| Impact {
                table: &schema.table(result.table).name,
                column: &schema.column(result.column).name,
                effect: effect_name(result.effect),
                rows: result.affected_rows,
            })
            .collect::<Vec<_>>();

        if self.json {
            serde_json::to_writer_pretty(&mut *out, &impacts)?;
            writeln!(out)?;
            return Ok(());
        }

        if impacts.is_empty() {
            writeln!(out, "no other items affected")?;
        }

        for impact in &impacts {
            writeln!(
                out,
                "{}.{}: {} row(s) {}",
                impact.table, impact.column, impact.rows, impact.effect
            )?;
        }

        Ok(())
    }
}

fn effect_name(effect: DeleteEffect) -> &'static str {
    match effect {
        DeleteEffect::Unlinked => "unlinked",
        DeleteEffect::Nulled => "nulled",
        DeleteEffect::Deleted => "deleted",
    }
}
