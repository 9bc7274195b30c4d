use peakascent_core::{
    schema::{ColumnId, TableId},
    BufferRowIndex,
};

use std::collections::{BTreeMap, BTreeSet};

/// One row added to or removed from a table buffer.
///
/// `index` is the row's position at the moment of the change. Removals of
/// several rows are recorded from the highest index down, so replaying the
/// list in order against the old buffer reproduces the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowChange {
    pub index: BufferRowIndex,
    pub added: bool,
}

/// Everything that changed during one change session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataChanges {
    /// Columns whose data changed
    pub changed_columns: BTreeSet<ColumnId>,

    /// Added and removed rows, per table, in the order they happened
    pub rows_added_or_removed: BTreeMap<TableId, Vec<RowChange>>,
}

/// Receives one batched notification per finished change session.
///
/// Sessions that changed nothing are not reported.
pub trait TableChangeListener: Send + Sync {
    fn data_changed(&self, changes: &DataChanges);
}

impl<F> TableChangeListener for F
where
    F: Fn(&DataChanges) + Send + Sync,
{
    fn data_changed(&self, changes: &DataChanges) {
        self(changes)
    }
}

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl DataChanges {
    pub fn is_empty(&self) -> bool {
        self.changed_columns.is_empty() && self.rows_added_or_removed.is_empty()
    }

    /// Whether any of `columns` changed or any row of `table` was added or
    /// removed.
    pub fn affects(&self, table: TableId, columns: &BTreeSet<ColumnId>) -> bool {
        self.rows_added_or_removed.contains_key(&table)
            || !self.changed_columns.is_disjoint(columns)
    }

    pub fn rows_for(&self, table: TableId) -> &[RowChange] {
        self.rows_added_or_removed
            .get(&table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn mark_column(&mut self, column: ColumnId) {
        self.changed_columns.insert(column);
    }

    pub(crate) fn mark_columns(&mut self, columns: impl IntoIterator<Item = ColumnId>) {
        self.changed_columns.extend(columns);
    }

    pub(crate) fn record_added(&mut self, table: TableId, index: BufferRowIndex) {
        self.record(table, RowChange { index, added: true });
    }

    pub(crate) fn record_removed(&mut self, table: TableId, index: BufferRowIndex) {
        self.record(table, RowChange { index, added: false });
    }

    fn record(&mut self, table: TableId, change: RowChange) {
        self.rows_added_or_removed
            .entry(table)
            .or_default()
            .push(change);
    }
}
