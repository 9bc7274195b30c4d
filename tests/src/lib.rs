pub use exec_log::ExecLog;

mod fixture;
pub use fixture::{Fixture, Ids};

pub use listener::RecordingListener;

mod logging_driver;
pub use logging_driver::{DriverOp, FailOn, LoggingDriver};

pub mod prelude {
    pub use crate::{ExecLog, Fixture, Ids, RecordingListener};
    pub use peakascent::{
        db::{DeleteEffect, WhatIfDeleteResult},
        record::{Ascent, Country, Hiker, Peak, Photo, Range, Region, Trip},
        schema::peak_ascent::*,
        BufferRowIndex, Database, DeletePolicy, ItemId, Table, ValidItemId, Value,
    };
    pub use std::collections::BTreeSet;
}

/// Routes engine logs through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PEAKASCENT_LOG"))
        .with_test_writer()
        .try_init();
}

/// Shorthand for a legal item ID.
pub fn id(id: i64) -> peakascent::ValidItemId {
    peakascent::ValidItemId::new(id)
}
