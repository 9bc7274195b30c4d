use super::{DataType, TableId};
use crate::Value;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Uniquely identifies the column in the schema.
    pub id: ColumnId,

    /// The name of the column in the backing store.
    pub name: String,

    /// Human readable label.
    pub ui_name: String,

    pub ty: DataType,

    /// Whether or not the column may hold no value
    pub nullable: bool,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,

    /// The primary key column this column references, if it is a foreign key
    pub references: Option<ColumnId>,

    /// Variant names for enum columns, empty otherwise
    pub enum_names: Vec<String>,
}

/// How a column takes part in the table's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Plain,
    PrimaryKey,
    ForeignKey,
    /// Key column of an associative table
    PrimaryForeignKey,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match (self.primary_key, self.references.is_some()) {
            (false, false) => ColumnKind::Plain,
            (true, false) => ColumnKind::PrimaryKey,
            (false, true) => ColumnKind::ForeignKey,
            (true, true) => ColumnKind::PrimaryForeignKey,
        }
    }

    pub fn is_foreign_key(&self) -> bool {
        self.references.is_some()
    }

    pub fn table(&self) -> TableId {
        self.id.table
    }

    /// Position of the column within its table, which is also the position
    /// of its cell within every buffered row.
    pub fn index(&self) -> usize {
        self.id.index
    }

    /// Whether `value` may be stored in this column.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }

        if !self.ty.accepts(value) {
            return false;
        }

        match (self.ty, value) {
            (DataType::Enum | DataType::DualEnum, Value::Integer(v)) if !self.enum_names.is_empty() => {
                (*v as usize) < self.enum_names.len()
            }
            _ => true,
        }
    }

    pub fn enum_name(&self, value: &Value) -> Option<&str> {
        match value {
            Value::Integer(v) if *v >= 0 => self.enum_names.get(*v as usize).map(String::as_str),
            _ => None,
        }
    }
}

impl ColumnId {
    pub const fn new(table: TableId, index: usize) -> Self {
        Self { table, index }
    }
}

impl From<&Column> for ColumnId {
    fn from(value: &Column) -> Self {
        value.id
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
