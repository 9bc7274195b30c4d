//! Typed views of single rows.

mod ascent;
pub use ascent::{Ascent, Hiker, Photo};

mod place;
pub use place::{Country, Peak, Range, Region};

mod trip;
pub use trip::Trip;

use peakascent_core::{
    schema::{ColumnId, TableId},
    ItemId, Result, Value,
};

/// A row of one normal table as a plain value.
pub trait Record: Sized {
    const TABLE: TableId;

    /// Primary key, invalid for records not yet stored.
    fn id(&self) -> ItemId;

    /// Reads a full buffer row.
    fn from_row(row: &[Value]) -> Result<Self>;

    /// Every column except the primary key, for inserts and updates.
    fn to_pairs(&self) -> Vec<(ColumnId, Value)>;
}

fn cell(row: &[Value], column: ColumnId) -> &Value {
    &row[column.index]
}
