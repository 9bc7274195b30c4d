pub mod breadcrumbs;
pub use breadcrumbs::{Breadcrumb, Breadcrumbs};

mod change;
pub use change::{DataChanges, ListenerId, RowChange, TableChangeListener};

mod config;
pub use config::{Config, DeletePolicy};

pub mod db;
pub use db::Database;

pub mod record;
pub use record::Record;

pub mod table;
pub use table::{AnyTable, AssociativeTable, LoadProgress, NormalTable, Table};

pub use peakascent_core::{
    schema, BufferRowIndex, Error, ItemId, Result, Schema, ValidItemId, Value,
};
