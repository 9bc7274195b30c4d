use super::Database;
use crate::table::Table;

use peakascent_core::{
    schema::{ColumnId, TableId},
    Result, Value,
};

const SETTINGS_TABLE: &str = "ProjectSettings";
const KEY_COLUMN: &str = "settingKey";
const VALUE_COLUMN: &str = "settingValue";

impl Database {
    /// Value stored under `key` in the project settings. Missing keys and
    /// NULL values both read as `None`.
    pub fn setting(&self, key: &str) -> Option<&str> {
        let (table, key_column, value_column) = self.settings_columns()?;
        let table = self.table(table);
        let index = table.find_rows(key_column, &Value::from(key)).into_iter().next()?;

        table.cell(index, value_column).as_str()
    }

    /// Stores `value` under `key`, replacing an existing entry.
    ///
    /// # Panics
    ///
    /// Panics outside a change session, or if the schema has no settings
    /// table.
    pub fn set_setting(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let Some((table, key_column, value_column)) = self.settings_columns() else {
            panic!("schema has no `{SETTINGS_TABLE}` table");
        };
        let value = value.into();

        let existing = self
            .table(table)
            .find_rows(key_column, &Value::from(key))
            .into_iter()
            .next()
            .map(|index| self.normal(table).get_primary_key_at(index));

        match existing {
            Some(id) => self.update_cell(table, id, value_column, value),
            None => {
                self.add_row(table, vec![(key_column, key.into()), (value_column, value)])?;
                Ok(())
            }
        }
    }

    /// The settings table with its key and value columns, if the schema has
    /// one.
    pub(crate) fn settings_columns(&self) -> Option<(TableId, ColumnId, ColumnId)> {
        let table = self.schema.table_by_name(SETTINGS_TABLE)?;

        Some((
            table.id,
            table.column_by_name(KEY_COLUMN)?.id,
            table.column_by_name(VALUE_COLUMN)?.id,
        ))
    }
}
