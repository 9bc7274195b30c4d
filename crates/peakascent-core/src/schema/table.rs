use super::{Column, ColumnId};

use std::fmt;

/// A table declared in the schema
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table in the backing store
    pub name: String,

    /// Human readable label
    pub ui_name: String,

    pub kind: TableKind,

    /// Project metadata, not part of relationship traversal
    pub meta: bool,

    /// The table's columns, in buffer cell order
    pub columns: Vec<Column>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Single integer primary key
    Normal,
    /// Many-to-many junction of two key columns
    Associative,
}

impl Table {
    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        assert_eq!(id.table, self.id, "column belongs to another table");
        &self.columns[id.index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn is_normal(&self) -> bool {
        self.kind == TableKind::Normal
    }

    pub fn is_associative(&self) -> bool {
        self.kind == TableKind::Associative
    }

    /// # Panics
    ///
    /// Panics if the table is associative.
    pub fn primary_key_column(&self) -> &Column {
        assert!(self.is_normal(), "{} has no single primary key", self.name);
        self.columns
            .iter()
            .find(|column| column.primary_key)
            .expect("verified normal table has a primary key")
    }

    pub fn foreign_key_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(|column| column.is_foreign_key())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> Self {
        value.id
    }
}
