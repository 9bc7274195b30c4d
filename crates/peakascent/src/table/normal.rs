use super::{check_value, remove_matching, Buffer, Cx, Table};
use crate::DataChanges;

use peakascent_core::{
    bail,
    driver::{Filter, Operation},
    schema::{ColumnId, TableId},
    BufferRowIndex, Error, Result, Schema, ValidItemId, Value,
};
use std::sync::Arc;

/// A table identified by a single integer primary key.
#[derive(Debug)]
pub struct NormalTable {
    schema: Arc<Schema>,
    id: TableId,
    primary_key: ColumnId,
    pub(super) buffer: Buffer,
}

impl NormalTable {
    pub(crate) fn new(schema: Arc<Schema>, id: TableId) -> Self {
        let primary_key = schema.table(id).primary_key_column().id;

        Self {
            schema,
            id,
            primary_key,
            buffer: Buffer::default(),
        }
    }

    pub fn primary_key_column(&self) -> ColumnId {
        self.primary_key
    }

    /// Linear scan for the row holding `key`.
    pub fn get_buffer_index_for_primary_key(&self, key: ValidItemId) -> Option<BufferRowIndex> {
        self.buffer.find_first(self.primary_key.index, &Value::Id(key))
    }

    pub fn get_primary_key_at(&self, index: BufferRowIndex) -> ValidItemId {
        match self.buffer.cell(index, self.primary_key.index) {
            Value::Id(key) => *key,
            other => panic!("primary key cell of `{}` holds {other:?}", self.name()),
        }
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = ValidItemId> + '_ {
        (0..self.buffer.len()).map(|i| self.get_primary_key_at(BufferRowIndex::new(i)))
    }

    /// Every row's primary key next to its value in `column`, in buffer
    /// order.
    pub fn pair_id_with(&self, column: ColumnId) -> Vec<(ValidItemId, Value)> {
        assert_eq!(column.table, self.id, "column belongs to another table");

        self.buffer
            .iter()
            .map(|(index, row)| (self.get_primary_key_at(index), row[column.index].clone()))
            .collect()
    }

    fn require_row(&self, key: ValidItemId) -> Result<BufferRowIndex> {
        self.get_buffer_index_for_primary_key(key).ok_or_else(|| {
            Error::record_not_found(format!("table={} key={}", self.name(), key))
        })
    }

    /// Inserts a row from sparse column/value pairs. Unmentioned nullable
    /// columns are NULL; the primary key is assigned by the store.
    pub(crate) fn add_row(
        &mut self,
        cx: &mut Cx<'_>,
        pairs: Vec<(ColumnId, Value)>,
    ) -> Result<BufferRowIndex> {
        let table = self.schema.table(self.id);
        self.check_pairs(&pairs)?;

        for column in &table.columns {
            if column.primary_key || column.nullable {
                continue;
            }
            if !pairs.iter().any(|(id, _)| *id == column.id) {
                bail!("column `{}.{}` requires a value", table.name, column.name);
            }
        }

        let key = cx
            .driver
            .exec(cx.schema, Operation::insert(self.id, pairs.clone()))?
            .into_inserted();
        let Some(key) = key.as_valid() else {
            bail!("backing store assigned no primary key to new `{}` row", table.name);
        };

        let mut row = vec![Value::Null; table.columns.len()];
        row[self.primary_key.index] = Value::Id(key);
        for (column, value) in &pairs {
            row[column.index] = value.clone();
        }

        let index = self.buffer.push(row);
        cx.changes.record_added(self.id, index);
        cx.changes.mark_column(self.primary_key);
        cx.changes.mark_columns(pairs.iter().map(|(column, _)| *column));

        tracing::debug!(table = %table.name, %key, "added row");
        Ok(index)
    }

    pub(crate) fn update_cell(
        &mut self,
        cx: &mut Cx<'_>,
        key: ValidItemId,
        column: ColumnId,
        value: Value,
    ) -> Result<()> {
        self.update_row(cx, key, vec![(column, value)])
    }

    pub(crate) fn update_row(
        &mut self,
        cx: &mut Cx<'_>,
        key: ValidItemId,
        pairs: Vec<(ColumnId, Value)>,
    ) -> Result<()> {
        let index = self.require_row(key)?;
        self.update_rows(cx, &[index], pairs)
    }

    /// Writes the same values into every given row.
    pub(crate) fn update_rows(
        &mut self,
        cx: &mut Cx<'_>,
        indices: &[BufferRowIndex],
        pairs: Vec<(ColumnId, Value)>,
    ) -> Result<()> {
        self.check_pairs(&pairs)?;

        if indices.is_empty() || pairs.is_empty() {
            return Ok(());
        }

        let keys = indices
            .iter()
            .map(|index| Value::Id(self.get_primary_key_at(*index)))
            .collect::<Vec<_>>();

        let updated = cx
            .driver
            .exec(
                cx.schema,
                Operation::update(self.id, pairs.clone(), Filter::any_of(self.primary_key, keys)),
            )?
            .into_count() as usize;

        if updated != indices.len() {
            tracing::warn!(
                table = %self.name(),
                updated,
                expected = indices.len(),
                "backing store updated a different number of rows"
            );
        }

        self.apply_update(indices, &pairs, cx.changes);
        Ok(())
    }

    /// Writes values into the buffer only, marking the columns changed.
    pub(crate) fn apply_update(
        &mut self,
        indices: &[BufferRowIndex],
        pairs: &[(ColumnId, Value)],
        changes: &mut DataChanges,
    ) {
        for index in indices {
            for (column, value) in pairs {
                self.buffer.set_cell(*index, column.index, value.clone());
            }
        }

        changes.mark_columns(pairs.iter().map(|(column, _)| *column));
    }

    /// Deletes one row without touching rows that reference it.
    pub(crate) fn remove_row(&mut self, cx: &mut Cx<'_>, key: ValidItemId) -> Result<()> {
        self.require_row(key)?;
        remove_matching(
            &mut self.buffer,
            cx,
            self.id,
            Filter::eq(self.primary_key, key),
        )?;
        Ok(())
    }

    pub(crate) fn remove_matching_rows(
        &mut self,
        cx: &mut Cx<'_>,
        column: ColumnId,
        value: Value,
    ) -> Result<usize> {
        assert_eq!(column.table, self.id, "column belongs to another table");

        // The store compares loosely, the buffer does not
        let table = self.schema.table(self.id);
        check_value(table, table.column(column), &value)?;

        remove_matching(&mut self.buffer, cx, self.id, Filter::Eq(column, value))
    }

    fn check_pairs(&self, pairs: &[(ColumnId, Value)]) -> Result<()> {
        let table = self.schema.table(self.id);

        for (i, (column, value)) in pairs.iter().enumerate() {
            assert_eq!(column.table, self.id, "column belongs to another table");
            let column = table.column(*column);

            if column.primary_key {
                bail!("primary key `{}.{}` cannot be written", table.name, column.name);
            }
            if pairs[..i].iter().any(|(other, _)| *other == column.id) {
                bail!("column `{}.{}` given twice", table.name, column.name);
            }

            check_value(table, column, value)?;
        }

        Ok(())
    }
}

impl Table for NormalTable {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn id(&self) -> TableId {
        self.id
    }

    fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}
