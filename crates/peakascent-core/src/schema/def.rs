use super::{DataType, TableKind};

/// Declarative description of one table.
///
/// Definitions are plain data; [`super::Builder`] turns a list of them
/// into a [`super::Schema`], resolving foreign keys by table name.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub ui_name: &'static str,
    pub kind: TableKind,
    pub meta: bool,
    pub columns: &'static [ColumnDef],
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ui_name: &'static str,
    pub ty: DataType,
    pub nullable: bool,
    pub primary_key: bool,

    /// Name of the table whose primary key this column references
    pub references: Option<&'static str>,

    pub enum_names: &'static [&'static str],
}

impl TableDef {
    pub const fn normal(
        name: &'static str,
        ui_name: &'static str,
        columns: &'static [ColumnDef],
    ) -> Self {
        Self {
            name,
            ui_name,
            kind: TableKind::Normal,
            meta: false,
            columns,
        }
    }

    pub const fn associative(
        name: &'static str,
        ui_name: &'static str,
        columns: &'static [ColumnDef],
    ) -> Self {
        Self {
            name,
            ui_name,
            kind: TableKind::Associative,
            meta: false,
            columns,
        }
    }

    /// Marks the table as project metadata.
    pub const fn meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

impl ColumnDef {
    pub const fn new(name: &'static str, ui_name: &'static str, ty: DataType) -> Self {
        Self {
            name,
            ui_name,
            ty,
            nullable: false,
            primary_key: false,
            references: None,
            enum_names: &[],
        }
    }

    pub const fn primary_key(name: &'static str) -> Self {
        let mut def = Self::new(name, "ID", DataType::Id);
        def.primary_key = true;
        def
    }

    pub const fn foreign_key(
        name: &'static str,
        ui_name: &'static str,
        table: &'static str,
    ) -> Self {
        let mut def = Self::new(name, ui_name, DataType::Id);
        def.references = Some(table);
        def
    }

    pub const fn primary_foreign_key(name: &'static str, table: &'static str) -> Self {
        let mut def = Self::foreign_key(name, name, table);
        def.primary_key = true;
        def
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn with_enum_names(mut self, names: &'static [&'static str]) -> Self {
        self.enum_names = names;
        self
    }
}
