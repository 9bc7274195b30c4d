mod builder;
pub use builder::{Builder, PROJECT_VERSION};

mod delete;
pub use delete::{affected_rows_per_table, DeleteEffect, WhatIfDeleteResult};

mod load;
pub use load::{load_in_background, Loading};

mod records;

mod settings;

use crate::{
    breadcrumbs::{BreadcrumbMatrix, Breadcrumbs},
    table::{AnyTable, AssociativeTable, Cx, NormalTable, Table},
    Config, DataChanges, ListenerId, TableChangeListener,
};

use peakascent_core::{
    schema::{ColumnId, TableId},
    BufferRowIndex, Driver, Result, Schema, ValidItemId, Value,
};
use std::{borrow::Cow, collections::BTreeSet, fmt, sync::Arc};
use tracing::debug;

/// An open project: every table's buffer, the breadcrumbs between them and
/// the change sessions that keep listeners informed.
///
/// All mutations happen inside a change session opened with
/// [`Database::begin_changing_data`]. Registered listeners are notified once
/// per session, when it is finished.
pub struct Database {
    schema: Arc<Schema>,
    driver: Box<dyn Driver>,
    config: Config,
    tables: Vec<AnyTable>,
    breadcrumbs: BreadcrumbMatrix,
    listeners: Vec<(ListenerId, Arc<dyn TableChangeListener>)>,
    next_listener: u64,

    /// Changes of the open session, if any
    pending: Option<DataChanges>,
}

impl Database {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(schema: Arc<Schema>, driver: Box<dyn Driver>, config: Config) -> Self {
        let tables = schema
            .tables()
            .iter()
            .map(|table| AnyTable::new(&schema, table.id))
            .collect();
        let breadcrumbs = BreadcrumbMatrix::compute(&schema);

        Self {
            schema,
            driver,
            config,
            tables,
            breadcrumbs,
            listeners: vec![],
            next_listener: 0,
            pending: None,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the backing store lives.
    pub fn url(&self) -> Cow<'_, str> {
        self.driver.url()
    }

    pub fn tables(&self) -> impl Iterator<Item = &AnyTable> + '_ {
        self.tables.iter()
    }

    pub fn table(&self, id: TableId) -> &AnyTable {
        &self.tables[id.0]
    }

    pub fn table_by_name(&self, name: &str) -> Option<&AnyTable> {
        let id = self.schema.table_by_name(name)?.id;
        Some(self.table(id))
    }

    /// # Panics
    ///
    /// Panics if `id` is an associative table.
    pub fn normal(&self, id: TableId) -> &NormalTable {
        match self.table(id).as_normal() {
            Some(table) => table,
            None => panic!("{id:?} is not a normal table"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` is a normal table.
    pub fn associative(&self, id: TableId) -> &AssociativeTable {
        match self.table(id).as_associative() {
            Some(table) => table,
            None => panic!("{id:?} is not an associative table"),
        }
    }

    /// The cached path of joins from `start` to `target`.
    ///
    /// # Panics
    ///
    /// Panics unless both are normal, non-meta tables.
    pub fn get_breadcrumbs_for(&self, start: TableId, target: TableId) -> &Breadcrumbs {
        self.breadcrumbs.get(start, target)
    }

    pub fn breadcrumb_matrix(&self) -> &BreadcrumbMatrix {
        &self.breadcrumbs
    }

    /// Rows of `target` related to row `index` of `start`.
    pub fn related_rows(
        &self,
        start: TableId,
        index: BufferRowIndex,
        target: TableId,
    ) -> BTreeSet<BufferRowIndex> {
        self.get_breadcrumbs_for(start, target).evaluate(self, index)
    }

    /// Opens a change session.
    ///
    /// # Panics
    ///
    /// Panics if a session is already open.
    pub fn begin_changing_data(&mut self) {
        assert!(
            self.pending.is_none(),
            "a change session is already open"
        );

        debug!("change session started");
        self.pending = Some(DataChanges::default());
    }

    /// Closes the open session and hands everything that changed during it
    /// to each listener in one call. Listeners are not called for a session
    /// that changed nothing.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn finish_changing_data(&mut self) {
        let Some(changes) = self.pending.take() else {
            panic!("no change session is open");
        };

        if changes.is_empty() {
            debug!("change session finished without changes");
            return;
        }

        debug!(
            columns = changes.changed_columns.len(),
            tables = changes.rows_added_or_removed.len(),
            listeners = self.listeners.len(),
            "change session finished; notifying listeners"
        );

        for (_, listener) in &self.listeners {
            listener.data_changed(&changes);
        }
    }

    pub fn currently_accepting_changes(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs `f` inside its own change session. The session is finished, and
    /// listeners told about whatever changed, even if `f` fails.
    pub fn change_data<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.begin_changing_data();
        let ret = f(self);
        self.finish_changing_data();
        ret
    }

    pub fn register_listener(&mut self, listener: Arc<dyn TableChangeListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if the listener was not registered.
    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Inserts a row into a normal table; see [`NormalTable`] for the rules.
    pub fn add_row(
        &mut self,
        table: TableId,
        pairs: Vec<(ColumnId, Value)>,
    ) -> Result<BufferRowIndex> {
        self.with_normal(table, |table, cx| table.add_row(cx, pairs))
    }

    pub fn update_cell(
        &mut self,
        table: TableId,
        key: ValidItemId,
        column: ColumnId,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        self.with_normal(table, |table, cx| table.update_cell(cx, key, column, value))
    }

    pub fn update_row(
        &mut self,
        table: TableId,
        key: ValidItemId,
        pairs: Vec<(ColumnId, Value)>,
    ) -> Result<()> {
        self.with_normal(table, |table, cx| table.update_row(cx, key, pairs))
    }

    /// Writes the same values into every given row (bulk edit).
    pub fn update_rows(
        &mut self,
        table: TableId,
        indices: &[BufferRowIndex],
        pairs: Vec<(ColumnId, Value)>,
    ) -> Result<()> {
        self.with_normal(table, |table, cx| table.update_rows(cx, indices, pairs))
    }

    /// Deletes one row without looking at rows referencing it. The backing
    /// store rejects the deletion if such rows exist; use
    /// [`Database::remove_rows`] to deal with them.
    pub fn remove_row(&mut self, table: TableId, key: ValidItemId) -> Result<()> {
        self.with_normal(table, |table, cx| table.remove_row(cx, key))
    }

    /// Deletes every row of a normal table holding `value` in `column`.
    pub fn remove_matching_rows(&mut self, column: ColumnId, value: impl Into<Value>) -> Result<usize> {
        let value = value.into();
        self.with_normal(column.table, |table, cx| {
            table.remove_matching_rows(cx, column, value)
        })
    }

    /// Relates `first` and `second` in an associative table, in column
    /// order. Returns `None` if they were already related.
    pub fn add_pair(
        &mut self,
        table: TableId,
        first: ValidItemId,
        second: ValidItemId,
    ) -> Result<Option<BufferRowIndex>> {
        self.with_associative(table, |table, cx| table.add_row(cx, first, second))
    }

    /// Returns `false` if the two were not related.
    pub fn remove_pair(
        &mut self,
        table: TableId,
        first: ValidItemId,
        second: ValidItemId,
    ) -> Result<bool> {
        self.with_associative(table, |table, cx| table.remove_row(cx, first, second))
    }

    /// Removes every relation of `key` held in `column`.
    pub fn remove_matching_pairs(&mut self, column: ColumnId, key: ValidItemId) -> Result<usize> {
        self.with_associative(column.table, |table, cx| {
            table.remove_matching_rows(cx, column, key)
        })
    }

    /// Makes `others` the exact set of entries related to `key` through
    /// the associative table owning `column`.
    pub fn set_matching_entries(
        &mut self,
        column: ColumnId,
        key: ValidItemId,
        others: &BTreeSet<ValidItemId>,
    ) -> Result<()> {
        self.with_associative(column.table, |table, cx| {
            table.set_matching_entries(cx, column, key, others)
        })
    }

    /// Splits `self` into the tables and what a mutation needs alongside.
    fn split(&mut self) -> (&mut [AnyTable], Cx<'_>) {
        let Self {
            schema,
            driver,
            tables,
            pending,
            ..
        } = self;

        let Some(changes) = pending.as_mut() else {
            panic!("data can only be changed inside a change session");
        };

        let cx = Cx {
            schema: &**schema,
            driver: &mut **driver,
            changes,
        };

        (tables, cx)
    }

    fn with_normal<R>(
        &mut self,
        table: TableId,
        f: impl FnOnce(&mut NormalTable, &mut Cx<'_>) -> Result<R>,
    ) -> Result<R> {
        let (tables, mut cx) = self.split();

        match tables[table.0].as_normal_mut() {
            Some(normal) => f(normal, &mut cx),
            None => panic!("{table:?} is not a normal table"),
        }
    }

    fn with_associative<R>(
        &mut self,
        table: TableId,
        f: impl FnOnce(&mut AssociativeTable, &mut Cx<'_>) -> Result<R>,
    ) -> Result<R> {
        let (tables, mut cx) = self.split();

        match tables[table.0].as_associative_mut() {
            Some(associative) => f(associative, &mut cx),
            None => panic!("{table:?} is not an associative table"),
        }
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .tables
            .iter()
            .map(|table| (table.name(), table.row_count()))
            .collect::<Vec<_>>();

        fmt.debug_struct("Database")
            .field("url", &self.driver.url())
            .field("rows", &rows)
            .field("listeners", &self.listeners.len())
            .field("accepting_changes", &self.pending.is_some())
            .finish()
    }
}
