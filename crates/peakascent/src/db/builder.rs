use super::Database;
use crate::{
    table::{LoadProgress, Table},
    Config, DeletePolicy,
};

use peakascent_core::{
    driver::Operation,
    schema::peak_ascent,
    Driver, Error, Result, Schema,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Project format version recorded in new projects.
pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configures and opens a [`Database`].
#[derive(Default)]
pub struct Builder {
    url: Option<String>,
    driver: Option<Box<dyn Driver>>,
    schema: Option<Arc<Schema>>,
    config: Config,
    create_schema: bool,
}

impl Builder {
    /// Backing store to connect to, e.g. `sqlite:project.db` or
    /// `sqlite::memory:`. Ignored if a driver is set.
    pub fn url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    /// Uses an already connected driver.
    pub fn driver(&mut self, driver: impl Driver) -> &mut Self {
        self.driver = Some(Box::new(driver));
        self
    }

    /// Replaces the project schema. Mostly useful in tests.
    pub fn schema(&mut self, schema: Schema) -> &mut Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn delete_policy(&mut self, policy: DeletePolicy) -> &mut Self {
        self.config.delete_policy = policy;
        self
    }

    pub fn progress_step(&mut self, rows: usize) -> &mut Self {
        self.config.progress_step = rows;
        self
    }

    /// Creates missing tables before loading. A project created this way
    /// records its version in the settings table.
    pub fn create_schema(&mut self, create: bool) -> &mut Self {
        self.create_schema = create;
        self
    }

    pub fn build(&mut self) -> Result<Database> {
        self.build_with_progress(|_| {})
    }

    /// Connects, optionally creates the schema and loads every buffer,
    /// reporting progress along the way.
    pub fn build_with_progress(
        &mut self,
        mut progress: impl FnMut(LoadProgress),
    ) -> Result<Database> {
        let schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => Arc::new(peak_ascent::schema()?),
        };

        let mut driver = match self.driver.take() {
            Some(driver) => driver,
            None => match &self.url {
                Some(url) => connect(url)?,
                None => return Err(Error::invalid_connection_url("no url or driver configured")),
            },
        };

        if self.create_schema {
            for table in schema.tables() {
                driver.exec(&schema, Operation::CreateTable(table.id))?;
            }
            debug!(tables = schema.tables().len(), "created schema");
        }

        let mut db = Database::new(schema, driver, self.config.clone());
        db.init_buffers(&mut progress)?;

        if self.create_schema && db.settings_columns().is_some() {
            let fresh = db.tables().all(|table| table.row_count() == 0);

            if fresh {
                db.change_data(|db| db.set_setting("version", PROJECT_VERSION))?;
                info!(url = %db.url(), version = PROJECT_VERSION, "created project");
            }
        }

        Ok(db)
    }
}

#[cfg(feature = "sqlite")]
fn connect(url: &str) -> Result<Box<dyn Driver>> {
    match url.split_once(':') {
        Some(("sqlite", _)) => {
            let connection = peakascent_driver_sqlite::Sqlite::new(url)?.connect()?;
            Ok(Box::new(connection))
        }
        _ => Err(Error::invalid_connection_url(format!(
            "unsupported backing store; url={url}"
        ))),
    }
}

#[cfg(not(feature = "sqlite"))]
fn connect(url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::invalid_connection_url(format!(
        "`sqlite` feature not enabled; url={url}"
    )))
}
