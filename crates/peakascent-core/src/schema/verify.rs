use super::{DataType, Schema, Table};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for table in &self.schema.tables {
            if table.is_normal() {
                self.verify_normal_table_primary_key(table)?;
            } else {
                self.verify_associative_table_columns(table)?;
            }

            self.verify_foreign_keys(table)?;
            self.verify_enum_columns(table)?;
        }

        Ok(())
    }

    fn verify_normal_table_primary_key(&self, table: &Table) -> Result<()> {
        let mut primary_keys = table.columns.iter().filter(|column| column.primary_key);

        let (Some(primary_key), None) = (primary_keys.next(), primary_keys.next()) else {
            return Err(Error::invalid_schema(format!(
                "normal table `{}` must have exactly one primary key column",
                table.name
            )));
        };

        if primary_key.ty != DataType::Id || primary_key.nullable || primary_key.is_foreign_key()
        {
            return Err(Error::invalid_schema(format!(
                "primary key `{}.{}` must be a non-nullable ID column",
                table.name, primary_key.name
            )));
        }

        Ok(())
    }

    fn verify_associative_table_columns(&self, table: &Table) -> Result<()> {
        let [first, second] = &table.columns[..] else {
            return Err(Error::invalid_schema(format!(
                "associative table `{}` must have exactly two columns",
                table.name
            )));
        };

        for column in [first, second] {
            if !column.primary_key || !column.is_foreign_key() || column.nullable {
                return Err(Error::invalid_schema(format!(
                    "column `{}.{}` of an associative table must be a non-nullable primary foreign key",
                    table.name, column.name
                )));
            }
        }

        Ok(())
    }

    fn verify_foreign_keys(&self, table: &Table) -> Result<()> {
        for column in table.foreign_key_columns() {
            let target = self.schema.column(column.references.expect("filtered"));
            let target_table = self.schema.table(target.table());

            if column.ty != DataType::Id {
                return Err(Error::invalid_schema(format!(
                    "foreign key `{}.{}` must be an ID column",
                    table.name, column.name
                )));
            }

            if !target_table.is_normal() || target_table.meta {
                return Err(Error::invalid_schema(format!(
                    "foreign key `{}.{}` must reference a normal table",
                    table.name, column.name
                )));
            }

            if table.is_normal() && target_table.id == table.id {
                return Err(Error::invalid_schema(format!(
                    "foreign key `{}.{}` references its own table",
                    table.name, column.name
                )));
            }
        }

        Ok(())
    }

    fn verify_enum_columns(&self, table: &Table) -> Result<()> {
        for column in &table.columns {
            if column.ty == DataType::Enum && column.enum_names.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "enum column `{}.{}` declares no variant names",
                    table.name, column.name
                )));
            }
        }

        Ok(())
    }
}
