use crate::{
    schema::{ColumnId, TableId},
    Value,
};

#[derive(Debug, Clone)]
pub enum Operation {
    /// Create a table from its schema declaration if it does not exist yet
    CreateTable(TableId),

    /// Count the rows of a table
    Count(TableId),

    /// Insert one row. Columns not listed take their default (NULL, or a
    /// fresh primary key)
    Insert(Insert),

    Update(Update),

    Delete(Delete),

    Transaction(Transaction),
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub table: TableId,
    pub columns: Vec<ColumnId>,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub table: TableId,
    pub assignments: Vec<(ColumnId, Value)>,
    pub filter: Filter,
}

#[derive(Debug, Clone)]
pub struct Delete {
    pub table: TableId,
    pub filter: Filter,
}

/// Row selection for updates and deletes
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(ColumnId, Value),
    In(ColumnId, Vec<Value>),
    And(Vec<Filter>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Start,
    Commit,
    Rollback,
}

impl Operation {
    pub fn insert(table: TableId, pairs: impl IntoIterator<Item = (ColumnId, Value)>) -> Self {
        let (columns, values) = pairs.into_iter().unzip();
        Self::Insert(Insert {
            table,
            columns,
            values,
        })
    }

    pub fn update(
        table: TableId,
        assignments: Vec<(ColumnId, Value)>,
        filter: Filter,
    ) -> Self {
        Self::Update(Update {
            table,
            assignments,
            filter,
        })
    }

    pub fn delete(table: TableId, filter: Filter) -> Self {
        Self::Delete(Delete { table, filter })
    }
}

impl Filter {
    pub fn eq(column: ColumnId, value: impl Into<Value>) -> Self {
        Self::Eq(column, value.into())
    }

    /// Matches rows whose `column` holds any of `values`.
    pub fn any_of(column: ColumnId, values: impl IntoIterator<Item = Value>) -> Self {
        Self::In(column, values.into_iter().collect())
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    /// Evaluates the filter against a buffered row.
    pub fn matches(&self, row: &[Value]) -> bool {
        match self {
            Self::Eq(column, value) => &row[column.index] == value,
            Self::In(column, values) => values.contains(&row[column.index]),
            Self::And(filters) => filters.iter().all(|filter| filter.matches(row)),
        }
    }
}
