use super::{remove_matching, Buffer, Cx, Table};

use peakascent_core::{
    driver::{Filter, Operation},
    schema::{ColumnId, TableId},
    BufferRowIndex, Result, Schema, ValidItemId, Value,
};
use std::{collections::BTreeSet, sync::Arc};

/// A many-to-many junction of two primary/foreign key columns.
#[derive(Debug)]
pub struct AssociativeTable {
    schema: Arc<Schema>,
    id: TableId,
    columns: [ColumnId; 2],
    pub(super) buffer: Buffer,
}

impl AssociativeTable {
    pub(crate) fn new(schema: Arc<Schema>, id: TableId) -> Self {
        let columns = [ColumnId::new(id, 0), ColumnId::new(id, 1)];

        Self {
            schema,
            id,
            columns,
            buffer: Buffer::default(),
        }
    }

    pub fn key_columns(&self) -> [ColumnId; 2] {
        self.columns
    }

    /// # Panics
    ///
    /// Panics if `column` is not one of this table's columns.
    pub fn get_other_column(&self, column: ColumnId) -> ColumnId {
        match self.columns {
            [first, second] if column == first => second,
            [first, second] if column == second => first,
            _ => panic!("{column:?} is not a column of `{}`", self.name()),
        }
    }

    /// The column of this table that references `foreign_primary_key`, if
    /// any.
    pub fn get_own_column_referencing(&self, foreign_primary_key: ColumnId) -> Option<ColumnId> {
        self.columns
            .into_iter()
            .find(|column| self.schema.column(*column).references == Some(foreign_primary_key))
    }

    /// The table on the far side of this junction, seen from the table
    /// owning `foreign_primary_key`.
    pub fn traverse_associative_relation(&self, foreign_primary_key: ColumnId) -> Option<TableId> {
        let own = self.get_own_column_referencing(foreign_primary_key)?;
        let other = self.get_other_column(own);
        self.schema.column(other).references.map(|target| target.table)
    }

    pub fn get_number_of_matching_rows(&self, column: ColumnId, key: ValidItemId) -> usize {
        self.find_rows(column, &Value::Id(key)).len()
    }

    /// Values in the other column of every row holding `key` in `column`.
    pub fn get_matching_entries(&self, column: ColumnId, key: ValidItemId) -> BTreeSet<ValidItemId> {
        let other = self.get_other_column(column);

        self.find_rows(column, &Value::Id(key))
            .into_iter()
            .filter_map(|index| self.cell(index, other).as_item_id().as_valid())
            .collect()
    }

    pub fn contains_pair(&self, first: ValidItemId, second: ValidItemId) -> bool {
        self.find_pair(first, second).is_some()
    }

    fn find_pair(&self, first: ValidItemId, second: ValidItemId) -> Option<BufferRowIndex> {
        let filter = self.pair_filter(first, second);
        self.buffer.matching(&filter).into_iter().next()
    }

    fn pair_filter(&self, first: ValidItemId, second: ValidItemId) -> Filter {
        Filter::and([
            Filter::eq(self.columns[0], first),
            Filter::eq(self.columns[1], second),
        ])
    }

    /// Adds the relation `(first, second)`, in column order. Returns `None`
    /// without touching the store if the pair already exists.
    pub(crate) fn add_row(
        &mut self,
        cx: &mut Cx<'_>,
        first: ValidItemId,
        second: ValidItemId,
    ) -> Result<Option<BufferRowIndex>> {
        if self.contains_pair(first, second) {
            tracing::debug!(table = %self.name(), %first, %second, "pair already present");
            return Ok(None);
        }

        cx.driver.exec(
            cx.schema,
            Operation::insert(
                self.id,
                [
                    (self.columns[0], Value::Id(first)),
                    (self.columns[1], Value::Id(second)),
                ],
            ),
        )?;

        let index = self.buffer.push(vec![Value::Id(first), Value::Id(second)]);
        cx.changes.record_added(self.id, index);
        cx.changes.mark_columns(self.columns);
        Ok(Some(index))
    }

    pub(crate) fn remove_row(
        &mut self,
        cx: &mut Cx<'_>,
        first: ValidItemId,
        second: ValidItemId,
    ) -> Result<bool> {
        let filter = self.pair_filter(first, second);
        let removed = remove_matching(&mut self.buffer, cx, self.id, filter)?;
        Ok(removed > 0)
    }

    pub(crate) fn remove_matching_rows(
        &mut self,
        cx: &mut Cx<'_>,
        column: ColumnId,
        key: ValidItemId,
    ) -> Result<usize> {
        assert!(
            self.columns.contains(&column),
            "{column:?} is not a column of `{}`",
            self.name()
        );
        remove_matching(&mut self.buffer, cx, self.id, Filter::eq(column, key))
    }

    /// Makes `others` the exact set of entries related to `key`.
    pub(crate) fn set_matching_entries(
        &mut self,
        cx: &mut Cx<'_>,
        column: ColumnId,
        key: ValidItemId,
        others: &BTreeSet<ValidItemId>,
    ) -> Result<()> {
        let current = self.get_matching_entries(column, key);
        let key_is_first = column == self.columns[0];
        let ordered = move |other: ValidItemId| {
            if key_is_first {
                (key, other)
            } else {
                (other, key)
            }
        };

        for stale in current.difference(others) {
            let (first, second) = ordered(*stale);
            self.remove_row(cx, first, second)?;
        }

        for missing in others.difference(&current) {
            let (first, second) = ordered(*missing);
            self.add_row(cx, first, second)?;
        }

        Ok(())
    }
}

impl Table for AssociativeTable {
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
