use peakascent_core::{
    driver::{Driver, Operation, Response},
    err,
    schema::TableId,
    Result, Schema, Value,
};
use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};

/// Decides whether an operation should fail instead of reaching the store.
pub type FailOn = fn(&Operation) -> bool;

/// A driver wrapper that logs every executed operation and can be told to
/// fail some of them.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Shared with the test so it can inspect the log while the database
    /// owns the driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,

    fail_on: Arc<Mutex<Option<FailOn>>>,
}

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,
    /// `None` if the operation failed
    pub response: Option<Response>,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::default(),
            fail_on: Arc::default(),
        }
    }

    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }

    pub fn fail_on_handle(&self) -> Arc<Mutex<Option<FailOn>>> {
        self.fail_on.clone()
    }
}

impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn exec(&mut self, schema: &Schema, operation: Operation) -> Result<Response> {
        let fail = self
            .fail_on
            .lock()
            .unwrap()
            .is_some_and(|fail_on| fail_on(&operation));

        let response = if fail {
            Err(err!("injected failure"))
        } else {
            self.inner.exec(schema, operation.clone())
        };

        self.ops_log.lock().unwrap().push(DriverOp {
            operation,
            response: response.as_ref().ok().cloned(),
        });

        response
    }

    fn scan(
        &mut self,
        schema: &Schema,
        table: TableId,
        row: &mut dyn FnMut(Vec<Value>) -> Result<()>,
    ) -> Result<()> {
        self.inner.scan(schema, table, row)
    }
}
