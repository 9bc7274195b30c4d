mod associative;
pub use associative::AssociativeTable;

mod buffer;
pub use buffer::Buffer;

mod normal;
pub use normal::NormalTable;

use crate::DataChanges;

use peakascent_core::{
    bail,
    driver::{Filter, Operation},
    schema::{self, Column, ColumnId, TableId},
    BufferRowIndex, Driver, Error, Result, Schema, Value,
};
use std::sync::Arc;

/// Read access shared by both kinds of table.
pub trait Table {
    fn schema(&self) -> &Arc<Schema>;

    fn id(&self) -> TableId;

    fn buffer(&self) -> &Buffer;

    fn def(&self) -> &schema::Table {
        self.schema().table(self.id())
    }

    fn name(&self) -> &str {
        &self.def().name
    }

    fn get_column_list(&self) -> &[Column] {
        &self.def().columns
    }

    fn num_columns(&self) -> usize {
        self.def().columns.len()
    }

    fn row_count(&self) -> usize {
        self.buffer().len()
    }

    fn row(&self, index: BufferRowIndex) -> &[Value] {
        self.buffer().row(index)
    }

    fn cell(&self, index: BufferRowIndex, column: ColumnId) -> &Value {
        assert_eq!(column.table, self.id(), "column belongs to another table");
        self.buffer().cell(index, column.index)
    }

    fn find_rows(&self, column: ColumnId, value: &Value) -> Vec<BufferRowIndex> {
        assert_eq!(column.table, self.id(), "column belongs to another table");
        self.buffer().find_rows(column.index, value)
    }
}

/// One of the two table kinds, as owned by the database.
#[derive(Debug)]
pub enum AnyTable {
    Normal(NormalTable),
    Associative(AssociativeTable),
}

/// What a mutation needs besides the table itself.
pub(crate) struct Cx<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) driver: &'a mut dyn Driver,
    pub(crate) changes: &'a mut DataChanges,
}

/// Progress of a buffer (re)population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub table: TableId,
    pub loaded: usize,
    pub total: usize,
}

impl AnyTable {
    pub(crate) fn new(schema: &Arc<Schema>, id: TableId) -> Self {
        if schema.table(id).is_normal() {
            Self::Normal(NormalTable::new(schema.clone(), id))
        } else {
            Self::Associative(AssociativeTable::new(schema.clone(), id))
        }
    }

    pub fn as_normal(&self) -> Option<&NormalTable> {
        match self {
            Self::Normal(table) => Some(table),
            Self::Associative(_) => None,
        }
    }

    pub fn as_associative(&self) -> Option<&AssociativeTable> {
        match self {
            Self::Associative(table) => Some(table),
            Self::Normal(_) => None,
        }
    }

    pub(crate) fn as_normal_mut(&mut self) -> Option<&mut NormalTable> {
        match self {
            Self::Normal(table) => Some(table),
            Self::Associative(_) => None,
        }
    }

    pub(crate) fn as_associative_mut(&mut self) -> Option<&mut AssociativeTable> {
        match self {
            Self::Associative(table) => Some(table),
            Self::Normal(_) => None,
        }
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        match self {
            Self::Normal(table) => &mut table.buffer,
            Self::Associative(table) => &mut table.buffer,
        }
    }

    /// Reads every row of the table from the backing store without touching
    /// the buffer.
    ///
    /// Emits progress every `step` rows and once the table is complete.
    pub(crate) fn load_rows(
        &self,
        driver: &mut dyn Driver,
        step: usize,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Vec<Vec<Value>>> {
        let schema = self.schema();
        let table = schema.table(self.id());
        let total = driver.exec(schema, Operation::Count(table.id))?.into_count() as usize;
        let step = step.max(1);

        let mut rows = Vec::with_capacity(total);
        driver.scan(schema, table.id, &mut |row| {
            check_row(table, &row)?;
            rows.push(row);

            if rows.len() % step == 0 {
                progress(LoadProgress {
                    table: table.id,
                    loaded: rows.len(),
                    total: total.max(rows.len()),
                });
            }
            Ok(())
        })?;

        progress(LoadProgress {
            table: table.id,
            loaded: rows.len(),
            total: rows.len(),
        });

        tracing::info!(table = %table.name, rows = rows.len(), "read table");
        Ok(rows)
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<Vec<Value>>) {
        self.buffer_mut().replace(rows);
    }

    pub(crate) fn apply_remove(&mut self, filter: &Filter, changes: &mut DataChanges) -> usize {
        let table = self.id();
        apply_remove(self.buffer_mut(), table, filter, changes)
    }
}

impl Table for AnyTable {
    fn schema(&self) -> &Arc<Schema> {
        match self {
            Self::Normal(table) => table.schema(),
            Self::Associative(table) => table.schema(),
        }
    }

    fn id(&self) -> TableId {
        match self {
            Self::Normal(table) => table.id(),
            Self::Associative(table) => table.id(),
        }
    }

    fn buffer(&self) -> &Buffer {
        match self {
            Self::Normal(table) => table.buffer(),
            Self::Associative(table) => table.buffer(),
        }
    }
}

/// Deletes every row matching `filter` from the store and the buffer.
/// Does not touch rows in other tables that reference the deleted ones.
fn remove_matching(
    buffer: &mut Buffer,
    cx: &mut Cx<'_>,
    table: TableId,
    filter: Filter,
) -> Result<usize> {
    let deleted = cx
        .driver
        .exec(cx.schema, Operation::delete(table, filter.clone()))?
        .into_count() as usize;

    let removed = apply_remove(buffer, table, &filter, cx.changes);

    if removed != deleted {
        let name = &cx.schema.table(table).name;
        tracing::warn!(
            table = %name,
            deleted,
            removed,
            "buffer and backing store disagreed on matching rows"
        );
        bail!(
            "buffer of `{name}` is out of sync: backing store deleted {deleted} row(s), \
             buffer removed {removed}; reload the buffers"
        );
    }

    Ok(removed)
}

/// Removes matching rows from the buffer only, recording each removal.
fn apply_remove(
    buffer: &mut Buffer,
    table: TableId,
    filter: &Filter,
    changes: &mut DataChanges,
) -> usize {
    let indices = buffer.matching(filter);

    for index in indices.iter().rev() {
        buffer.remove(*index);
        changes.record_removed(table, *index);
    }

    indices.len()
}

/// Checks a full row coming from the backing store.
fn check_row(table: &schema::Table, row: &[Value]) -> Result<()> {
    if row.len() != table.columns.len() {
        bail!(
            "row of `{}` has {} cells, expected {}",
            table.name,
            row.len(),
            table.columns.len()
        );
    }

    for (column, value) in table.columns.iter().zip(row) {
        check_value(table, column, value)?;
    }

    Ok(())
}

/// Checks that `value` may be written to `column`.
pub(crate) fn check_value(table: &schema::Table, column: &Column, value: &Value) -> Result<()> {
    if column.accepts(value) {
        return Ok(());
    }

    if value.is_null() {
        bail!("column `{}.{}` does not accept NULL", table.name, column.name);
    }

    Err(Error::type_conversion(value.clone(), column.ty.name()).context(
        peakascent_core::err!("writing `{}.{}`", table.name, column.name),
    ))
}
