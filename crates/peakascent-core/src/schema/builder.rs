use super::{Column, ColumnId, Schema, Table, TableDef, TableId};
use crate::{Error, Result};

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Builder {
    tables: Vec<TableDef>,
}

/// Used to track state during the build process
struct BuildSchema {
    /// Maps table names to identifiers. The identifiers are reserved before
    /// the table objects are actually created.
    table_lookup: IndexMap<&'static str, TableId>,

    /// Tables as they are built
    tables: Vec<Table>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&mut self, def: TableDef) -> &mut Self {
        self.tables.push(def);
        self
    }

    pub fn tables(&mut self, defs: impl IntoIterator<Item = TableDef>) -> &mut Self {
        self.tables.extend(defs);
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut builder = BuildSchema {
            table_lookup: IndexMap::new(),
            tables: vec![],
        };

        for (index, def) in self.tables.iter().enumerate() {
            if builder.table_lookup.insert(def.name, TableId(index)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "table `{}` is declared twice",
                    def.name
                )));
            }
        }

        for (index, def) in self.tables.iter().enumerate() {
            let table = builder.build_table(TableId(index), def)?;
            builder.tables.push(table);
        }

        for def in &self.tables {
            builder.resolve_foreign_keys(def)?;
        }

        let schema = Schema {
            tables: builder.tables,
        };

        schema.verify()?;

        Ok(schema)
    }
}

impl BuildSchema {
    fn build_table(&self, id: TableId, def: &TableDef) -> Result<Table> {
        let mut columns: Vec<Column> = Vec::with_capacity(def.columns.len());

        for (index, column) in def.columns.iter().enumerate() {
            if columns.iter().any(|existing| existing.name == column.name) {
                return Err(Error::invalid_schema(format!(
                    "column `{}.{}` is declared twice",
                    def.name, column.name
                )));
            }

            columns.push(Column {
                id: ColumnId::new(id, index),
                name: column.name.to_string(),
                ui_name: column.ui_name.to_string(),
                ty: column.ty,
                nullable: column.nullable,
                primary_key: column.primary_key,
                // Resolved once every table exists
                references: None,
                enum_names: column.enum_names.iter().map(|name| name.to_string()).collect(),
            });
        }

        Ok(Table {
            id,
            name: def.name.to_string(),
            ui_name: def.ui_name.to_string(),
            kind: def.kind,
            meta: def.meta,
            columns,
        })
    }

    fn resolve_foreign_keys(&mut self, def: &TableDef) -> Result<()> {
        let table_id = self.table_lookup[def.name];

        for (index, column) in def.columns.iter().enumerate() {
            let Some(target_name) = column.references else {
                continue;
            };

            let Some(&target_id) = self.table_lookup.get(target_name) else {
                return Err(Error::invalid_schema(format!(
                    "column `{}.{}` references unknown table `{}`",
                    def.name, column.name, target_name
                )));
            };

            let target = &self.tables[target_id.0];
            let Some(primary_key) = target.columns.iter().find(|column| column.primary_key)
            else {
                return Err(Error::invalid_schema(format!(
                    "column `{}.{}` references `{}`, which has no primary key",
                    def.name, column.name, target_name
                )));
            };

            let primary_key = primary_key.id;
            self.tables[table_id.0].columns[index].references = Some(primary_key);
        }

        Ok(())
    }
}
