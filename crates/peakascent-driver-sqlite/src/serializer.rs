use peakascent_core::{
    driver::{
        operation::{Delete, Insert, Update},
        Filter,
    },
    schema::{Table, TableId},
    Schema, Value,
};

use std::fmt::Write;

/// Renders operations as SQLite statements with positional parameters.
pub(crate) struct Serializer<'a> {
    schema: &'a Schema,
}

impl<'a> Serializer<'a> {
    pub(crate) fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub(crate) fn create_table(&self, table: TableId) -> String {
        let table = self.schema.table(table);
        let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (", ident(&table.name));

        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }

            write!(sql, "{} {}", ident(&column.name), column.ty.sql_type()).unwrap();

            if column.primary_key && table.is_normal() {
                sql.push_str(" PRIMARY KEY");
            } else if !column.nullable {
                sql.push_str(" NOT NULL");
            }

            if let Some(target) = column.references {
                let target_table = self.schema.table(target.table);
                write!(
                    sql,
                    " REFERENCES {}({})",
                    ident(&target_table.name),
                    ident(&self.schema.column(target).name)
                )
                .unwrap();
            }
        }

        if table.is_associative() {
            let keys = table
                .columns
                .iter()
                .map(|column| ident(&column.name))
                .collect::<Vec<_>>();
            write!(sql, ", PRIMARY KEY ({})", keys.join(", ")).unwrap();
        }

        sql.push(')');
        sql
    }

    pub(crate) fn count(&self, table: TableId) -> String {
        format!("SELECT COUNT(*) FROM {}", ident(&self.schema.table(table).name))
    }

    pub(crate) fn select_all(&self, table: &Table) -> String {
        let columns = table
            .columns
            .iter()
            .map(|column| ident(&column.name))
            .collect::<Vec<_>>();

        let order = if table.is_normal() {
            ident(&table.primary_key_column().name)
        } else {
            "rowid".to_string()
        };

        format!(
            "SELECT {} FROM {} ORDER BY {}",
            columns.join(", "),
            ident(&table.name),
            order
        )
    }

    pub(crate) fn insert(&self, op: &Insert, params: &mut Vec<Value>) -> String {
        let table = self.schema.table(op.table);

        if op.columns.is_empty() {
            return format!("INSERT INTO {} DEFAULT VALUES", ident(&table.name));
        }

        let columns = op
            .columns
            .iter()
            .map(|column| ident(&table.column(*column).name))
            .collect::<Vec<_>>();
        let placeholders = vec!["?"; op.values.len()];
        params.extend(op.values.iter().cloned());

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident(&table.name),
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    pub(crate) fn update(&self, op: &Update, params: &mut Vec<Value>) -> String {
        let table = self.schema.table(op.table);

        let assignments = op
            .assignments
            .iter()
            .map(|(column, value)| {
                params.push(value.clone());
                format!("{} = ?", ident(&table.column(*column).name))
            })
            .collect::<Vec<_>>();

        let mut sql = format!("UPDATE {} SET {}", ident(&table.name), assignments.join(", "));
        self.filter(table, &op.filter, &mut sql, params);
        sql
    }

    pub(crate) fn delete(&self, op: &Delete, params: &mut Vec<Value>) -> String {
        let table = self.schema.table(op.table);
        let mut sql = format!("DELETE FROM {}", ident(&table.name));
        self.filter(table, &op.filter, &mut sql, params);
        sql
    }

    fn filter(&self, table: &Table, filter: &Filter, sql: &mut String, params: &mut Vec<Value>) {
        sql.push_str(" WHERE ");
        self.filter_expr(table, filter, sql, params);
    }

    fn filter_expr(&self, table: &Table, filter: &Filter, sql: &mut String, params: &mut Vec<Value>) {
        match filter {
            Filter::Eq(column, Value::Null) => {
                write!(sql, "{} IS NULL", ident(&table.column(*column).name)).unwrap();
            }
            Filter::Eq(column, value) => {
                write!(sql, "{} = ?", ident(&table.column(*column).name)).unwrap();
                params.push(value.clone());
            }
            Filter::In(_, values) if values.is_empty() => sql.push('0'),
            Filter::In(column, values) => {
                let placeholders = vec!["?"; values.len()];
                write!(
                    sql,
                    "{} IN ({})",
                    ident(&table.column(*column).name),
                    placeholders.join(", ")
                )
                .unwrap();
                params.extend(values.iter().cloned());
            }
            Filter::And(filters) if filters.is_empty() => sql.push('1'),
            Filter::And(filters) => {
                sql.push('(');
                for (i, filter) in filters.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(" AND ");
                    }
                    self.filter_expr(table, filter, sql, params);
                }
                sql.push(')');
            }
        }
    }
}

fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
