mod builder;
pub use builder::Builder;

mod column;
pub use column::{Column, ColumnId, ColumnKind};

mod def;
pub use def::{ColumnDef, TableDef};

pub mod peak_ascent;

mod table;
pub use table::{Table, TableId, TableKind};

mod ty;
pub use ty::DataType;

mod verify;

/// The frozen table layout of a project.
///
/// Built once by [`Builder`] and never mutated afterwards; every other
/// structure refers into it through [`TableId`] and [`ColumnId`] handles.
#[derive(Debug)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    pub fn column(&self, id: impl Into<ColumnId>) -> &Column {
        let id = id.into();
        self.table(id.table)
            .columns
            .get(id.index)
            .expect("invalid column ID")
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    /// Normal tables that take part in relationship traversal.
    pub fn normal_tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.tables
            .iter()
            .filter(|table| table.is_normal() && !table.meta)
    }

    pub fn associative_tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.tables.iter().filter(|table| table.is_associative())
    }

    /// Every foreign key column, in any table, that references `primary_key`.
    pub fn columns_referencing(
        &self,
        primary_key: ColumnId,
    ) -> impl Iterator<Item = &Column> + '_ {
        self.tables
            .iter()
            .flat_map(|table| table.columns.iter())
            .filter(move |column| column.references == Some(primary_key))
    }
}
