use crate::normal_table;

use anyhow::{bail, Result};
use clap::Args;
use peakascent::{Database, Table, ValidItemId};
use std::io::Write;

#[derive(Args, Debug)]
pub struct RelatedCommand {
    /// Table of the starting item
    pub from: String,

    /// Primary key of the starting item
    pub id: i64,

    /// Table to list related items of
    pub to: String,
}

impl RelatedCommand {
    pub(crate) fn run(&self, db: &Database, out: &mut dyn Write) -> Result<()> {
        let from = normal_table(db, &self.from)?;
        let to = normal_table(db, &self.to)?;

        let Some(key) = ValidItemId::try_new(self.id) else {
            bail!("{} is not a valid ID", self.id);
        };
        let Some(index) = from.get_buffer_index_for_primary_key(key) else {
            bail!("`{}` has no item {key}", from.name());
        };

        let crumbs = db.get_breadcrumbs_for(from.id(), to.id());
        tracing::debug!(?crumbs, "evaluating");

        let mut keys = crumbs
            .evaluate(db, index)
            .into_iter()
            .map(|index| to.get_primary_key_at(index))
            .collect::<Vec<_>>();
        keys.sort();

        for key in keys {
            writeln!(out, "{key}")?;
        }

        Ok(())
    }
}
