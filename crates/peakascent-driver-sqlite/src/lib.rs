mod serializer;
use serializer::Serializer;

mod value;
pub(crate) use value::Value;

use peakascent_core::{
    driver::{operation::Transaction, Driver, Operation, Response},
    schema::TableId,
    Error, ItemId, Result, Schema, Value as CoreValue,
};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a connection URL: `sqlite:<path>`
    /// or `sqlite::memory:`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else if url.path().is_empty() {
            Err(Error::invalid_connection_url(format!(
                "connection URL has no file path; url={}",
                url_str
            )))
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    pub fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    pub fn connect(&self) -> Result<Connection> {
        let connection = match self {
            Sqlite::File(path) => {
                RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?
            }
            Sqlite::InMemory => {
                RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?
            }
        };

        connection
            .execute_batch("PRAGMA foreign_keys = ON")
            .map_err(Error::driver_operation_failed)?;

        tracing::debug!(url = %self.url(), "opened sqlite connection");

        Ok(Connection {
            source: self.clone(),
            connection,
        })
    }
}

#[derive(Debug)]
pub struct Connection {
    source: Sqlite,
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        Sqlite::InMemory.connect()
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Sqlite::open(path).connect()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        tracing::trace!(%sql, params = params.len(), "execute");

        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        stmt.execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)
    }

    fn transaction(&self, transaction: Transaction) -> Result<Response> {
        let sql = match transaction {
            Transaction::Start => "BEGIN",
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        };

        self.execute(sql, &[])?;
        Ok(Response::count(0))
    }
}

impl Driver for Connection {
    fn url(&self) -> Cow<'_, str> {
        self.source.url()
    }

    fn exec(&mut self, schema: &Schema, op: Operation) -> Result<Response> {
        let serializer = Serializer::new(schema);
        let mut params = Vec::<CoreValue>::new();

        let sql = match &op {
            Operation::CreateTable(table) => serializer.create_table(*table),
            Operation::Count(table) => {
                let sql = serializer.count(*table);
                tracing::trace!(%sql, "query");

                let count: i64 = self
                    .connection
                    .query_row(&sql, [], |row| row.get(0))
                    .map_err(Error::driver_operation_failed)?;
                return Ok(Response::count(count as u64));
            }
            Operation::Insert(insert) => serializer.insert(insert, &mut params),
            Operation::Update(update) => serializer.update(update, &mut params),
            Operation::Delete(delete) => serializer.delete(delete, &mut params),
            Operation::Transaction(transaction) => return self.transaction(*transaction),
        };

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        let count = self.execute(&sql, &params)?;

        match op {
            Operation::Insert(insert) if schema.table(insert.table).is_normal() => Ok(
                Response::Inserted(ItemId::new(self.connection.last_insert_rowid())),
            ),
            _ => Ok(Response::count(count as u64)),
        }
    }

    fn scan(
        &mut self,
        schema: &Schema,
        table: TableId,
        row: &mut dyn FnMut(Vec<CoreValue>) -> Result<()>,
    ) -> Result<()> {
        let table = schema.table(table);
        let sql = Serializer::new(schema).select_all(table);
        tracing::trace!(%sql, "scan");

        let mut stmt = self
            .connection
            .prepare(&sql)
            .map_err(Error::driver_operation_failed)?;
        let mut rows = stmt.query([]).map_err(Error::driver_operation_failed)?;

        while let Some(sql_row) = rows.next().map_err(Error::driver_operation_failed)? {
            let cells = table
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    Value::from_sql(sql_row, index, column).map(Value::into_inner)
                })
                .collect::<Result<Vec<_>>>()?;

            row(cells)?;
        }

        Ok(())
    }
}
