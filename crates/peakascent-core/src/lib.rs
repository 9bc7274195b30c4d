pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, IntoError};

mod id;
pub use id::{BufferRowIndex, ItemId, ValidItemId, LOWEST_LEGAL_ID};

pub mod schema;
pub use schema::Schema;

mod value;
pub use value::Value;

/// A Result type alias that uses the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
