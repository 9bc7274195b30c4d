pub mod operation;
pub use operation::{Filter, Operation, Transaction};

mod response;
pub use response::Response;

use crate::{schema::TableId, Result, Schema, Value};

use std::{borrow::Cow, fmt::Debug};

/// A synchronous backing store.
///
/// The table layer keeps its buffers coherent with whatever the driver
/// reports, so a driver must either apply an operation completely or return
/// an error.
pub trait Driver: Debug + Send + 'static {
    /// Connection URL the driver was opened with.
    fn url(&self) -> Cow<'_, str>;

    /// Execute a write or control operation.
    fn exec(&mut self, schema: &Schema, op: Operation) -> Result<Response>;

    /// Stream every row of `table`, cells in column order, to `row`.
    fn scan(
        &mut self,
        schema: &Schema,
        table: TableId,
        row: &mut dyn FnMut(Vec<Value>) -> Result<()>,
    ) -> Result<()>;
}
