use super::Database;
use crate::{config::DeletePolicy, table::Table};

use indexmap::IndexMap;
use peakascent_core::{
    driver::{Filter, Operation, Transaction},
    schema::{ColumnId, TableId},
    BufferRowIndex, Error, Result, ValidItemId, Value,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// What deleting a set of rows does to one referencing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatIfDeleteResult {
    /// Table holding the affected rows
    pub table: TableId,

    /// Column referencing the deleted rows
    pub column: ColumnId,

    pub effect: DeleteEffect,

    /// Number of affected rows in `table`
    pub affected_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeleteEffect {
    /// Rows of an associative table are removed.
    Unlinked,

    /// A nullable reference is set to NULL.
    Nulled,

    /// The reference is not nullable, so the referencing row is deleted too.
    Deleted,
}

/// Everything a deletion touches, discovered before anything changes.
#[derive(Debug, Default)]
struct Plan {
    /// Keys to delete per normal table, in discovery order. The requested
    /// rows come first.
    deletions: IndexMap<TableId, BTreeSet<ValidItemId>>,

    /// Associative rows to remove, by the column referencing a deleted key
    unlinks: IndexMap<ColumnId, Unlink>,

    /// Rows whose nullable reference is cleared, by referencing column
    nulls: IndexMap<ColumnId, BTreeSet<ValidItemId>>,

    /// The column each non-requested deletion was discovered through
    deleted_via: IndexMap<ColumnId, BTreeSet<ValidItemId>>,
}

#[derive(Debug, Default)]
struct Unlink {
    /// Deleted keys referenced through the column
    keys: BTreeSet<ValidItemId>,

    /// Number of associative rows holding one of `keys`
    rows: usize,
}

impl Database {
    /// Reports what deleting `keys` from `table` would do to other rows,
    /// without changing anything. Keys not present in the table are ignored.
    ///
    /// Rows referencing a deleted row through a non-nullable column are
    /// reported as [`DeleteEffect::Deleted`] regardless of the configured
    /// policy; with [`DeletePolicy::Restrict`] such entries mean
    /// [`Database::remove_rows`] will refuse.
    pub fn what_if_remove_rows(
        &self,
        table: TableId,
        keys: &[ValidItemId],
    ) -> Vec<WhatIfDeleteResult> {
        let present = keys
            .iter()
            .copied()
            .filter(|key| {
                self.normal(table)
                    .get_buffer_index_for_primary_key(*key)
                    .is_some()
            })
            .collect();

        self.plan_removal(table, present).results()
    }

    /// Deletes `keys` from `table` and deals with every row referencing
    /// them, as previewed by [`Database::what_if_remove_rows`].
    ///
    /// Associative rows are removed first, then nullable references are
    /// cleared, then rows are deleted, dependents before the rows they
    /// reference. The backing store sees all of it as one transaction and
    /// the buffers are only patched once it committed.
    ///
    /// # Panics
    ///
    /// Panics outside a change session.
    pub fn remove_rows(
        &mut self,
        table: TableId,
        keys: &[ValidItemId],
    ) -> Result<Vec<WhatIfDeleteResult>> {
        assert!(
            self.currently_accepting_changes(),
            "data can only be changed inside a change session"
        );

        let name = &self.schema.table(table).name;
        for key in keys {
            if self
                .normal(table)
                .get_buffer_index_for_primary_key(*key)
                .is_none()
            {
                return Err(Error::record_not_found(format!("table={name} key={key}")));
            }
        }

        let plan = self.plan_removal(table, keys.iter().copied().collect());
        let results = plan.results();

        if self.config.delete_policy == DeletePolicy::Restrict {
            if let Some(blocking) = results
                .iter()
                .find(|result| result.effect == DeleteEffect::Deleted)
            {
                let column = self.schema.column(blocking.column);
                let dependent = &self.schema.table(blocking.table).name;

                warn!(
                    table = %name,
                    dependent = %dependent,
                    rows = blocking.affected_rows,
                    "deletion restricted"
                );

                return Err(Error::referential_integrity(format!(
                    "{} row(s) of `{dependent}` reference the deleted `{name}` rows through \
                     non-nullable `{}`",
                    blocking.affected_rows, column.name
                )));
            }
        }

        self.execute_plan(&plan)?;
        self.apply_plan(&plan);

        info!(
            table = %self.schema.table(table).name,
            rows = keys.len(),
            dependents = results.len(),
            "removed rows"
        );

        Ok(results)
    }

    fn plan_removal(&self, table: TableId, keys: BTreeSet<ValidItemId>) -> Plan {
        let mut plan = Plan::default();
        let mut queue = vec![(table, keys.clone())];
        plan.deletions.insert(table, keys);

        while let Some((table, keys)) = queue.pop() {
            let primary_key = self.normal(table).primary_key_column();

            for column in self.schema.columns_referencing(primary_key) {
                let referencing = column.table();

                if self.schema.table(referencing).is_associative() {
                    let unlinked = self
                        .table(referencing)
                        .buffer()
                        .iter()
                        .filter_map(|(_, row)| row[column.index()].as_item_id().as_valid())
                        .filter(|key| keys.contains(key))
                        .collect::<Vec<_>>();

                    let unlink = plan.unlinks.entry(column.id).or_default();
                    unlink.rows += unlinked.len();
                    unlink.keys.extend(unlinked);
                    continue;
                }

                let rows = self.referencing_keys(column.id, &keys);
                if rows.is_empty() {
                    continue;
                }

                if column.nullable {
                    plan.nulls.entry(column.id).or_default().extend(rows);
                    continue;
                }

                let scheduled = plan.deletions.entry(referencing).or_default();
                let new = rows
                    .into_iter()
                    .filter(|key| scheduled.insert(*key))
                    .collect::<BTreeSet<_>>();

                if !new.is_empty() {
                    plan.deleted_via
                        .entry(column.id)
                        .or_default()
                        .extend(new.iter().copied());
                    queue.push((referencing, new));
                }
            }
        }

        // Rows that go away anyway need no cleared references.
        for (column, keys) in &mut plan.nulls {
            if let Some(deleted) = plan.deletions.get(&column.table) {
                keys.retain(|key| !deleted.contains(key));
            }
        }

        plan.unlinks.retain(|_, unlink| unlink.rows > 0);
        plan.nulls.retain(|_, keys| !keys.is_empty());
        plan
    }

    /// Primary keys of the rows holding one of `keys` in `column`.
    fn referencing_keys(
        &self,
        column: ColumnId,
        keys: &BTreeSet<ValidItemId>,
    ) -> BTreeSet<ValidItemId> {
        let table = self.normal(column.table);

        table
            .buffer()
            .iter()
            .filter(|(_, row)| {
                row[column.index]
                    .as_item_id()
                    .as_valid()
                    .is_some_and(|key| keys.contains(&key))
            })
            .map(|(index, _)| table.get_primary_key_at(index))
            .collect()
    }

    fn execute_plan(&mut self, plan: &Plan) -> Result<()> {
        let schema = self.schema.clone();
        let driver = &mut *self.driver;

        driver.exec(&schema, Operation::Transaction(Transaction::Start))?;

        let mut run = || -> Result<()> {
            for (column, unlink) in &plan.unlinks {
                driver.exec(
                    &schema,
                    Operation::delete(column.table, Filter::any_of(*column, ids(&unlink.keys))),
                )?;
            }

            for (column, keys) in &plan.nulls {
                let primary_key = schema.table(column.table).primary_key_column().id;
                driver.exec(
                    &schema,
                    Operation::update(
                        column.table,
                        vec![(*column, Value::Null)],
                        Filter::any_of(primary_key, ids(keys)),
                    ),
                )?;
            }

            for (table, keys) in plan.deletions.iter().rev() {
                let primary_key = schema.table(*table).primary_key_column().id;
                driver.exec(
                    &schema,
                    Operation::delete(*table, Filter::any_of(primary_key, ids(keys))),
                )?;
            }

            Ok(())
        };

        let ret = run().and_then(|()| {
            driver.exec(&schema, Operation::Transaction(Transaction::Commit))?;
            Ok(())
        });

        // A failed COMMIT leaves the transaction open as well
        match ret {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Err(rollback) =
                    driver.exec(&schema, Operation::Transaction(Transaction::Rollback))
                {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Mirrors a committed plan in the buffers.
    fn apply_plan(&mut self, plan: &Plan) {
        let (tables, cx) = self.split();

        for (column, unlink) in &plan.unlinks {
            let filter = Filter::any_of(*column, ids(&unlink.keys));
            tables[column.table.0].apply_remove(&filter, cx.changes);
        }

        for (column, keys) in &plan.nulls {
            let Some(table) = tables[column.table.0].as_normal_mut() else {
                continue;
            };

            let indices = keys
                .iter()
                .filter_map(|key| table.get_buffer_index_for_primary_key(*key))
                .collect::<Vec<BufferRowIndex>>();

            table.apply_update(&indices, &[(*column, Value::Null)], cx.changes);
        }

        for (table, keys) in plan.deletions.iter().rev() {
            let primary_key = cx.schema.table(*table).primary_key_column().id;
            let filter = Filter::any_of(primary_key, ids(keys));
            tables[table.0].apply_remove(&filter, cx.changes);
        }
    }
}

impl Plan {
    fn results(&self) -> Vec<WhatIfDeleteResult> {
        let mut results = vec![];

        let mut push = |column: ColumnId, effect, affected_rows| {
            results.push(WhatIfDeleteResult {
                table: column.table,
                column,
                effect,
                affected_rows,
            });
        };

        for (column, unlink) in &self.unlinks {
            push(*column, DeleteEffect::Unlinked, unlink.rows);
        }

        for (column, keys) in &self.nulls {
            push(*column, DeleteEffect::Nulled, keys.len());
        }

        for (column, keys) in &self.deleted_via {
            push(*column, DeleteEffect::Deleted, keys.len());
        }

        results
    }
}

fn ids(keys: &BTreeSet<ValidItemId>) -> Vec<Value> {
    keys.iter().copied().map(Value::Id).collect()
}

/// Groups what-if results by table, summing affected rows.
pub fn affected_rows_per_table(results: &[WhatIfDeleteResult]) -> BTreeMap<TableId, usize> {
    let mut per_table = BTreeMap::new();

    for result in results {
        *per_table.entry(result.table).or_default() += result.affected_rows;
    }

    per_table
}
