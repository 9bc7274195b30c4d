use super::{Builder, Database};
use crate::table::LoadProgress;

use peakascent_core::{Error, Result};
use tokio::{sync::mpsc, task::JoinHandle};

/// A database being opened on a blocking worker thread.
///
/// Dropping it discards the load; the worker finishes on its own and its
/// result is thrown away.
#[derive(Debug)]
pub struct Loading {
    /// Progress events, in order. Closed once loading ended.
    pub progress: mpsc::UnboundedReceiver<LoadProgress>,

    handle: JoinHandle<Result<Database>>,
}

/// Builds `builder` on tokio's blocking pool.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn load_in_background(mut builder: Builder) -> Loading {
    let (tx, progress) = mpsc::unbounded_channel();

    let handle = tokio::task::spawn_blocking(move || {
        builder.build_with_progress(|event| {
            // The receiver may already be gone; the load carries on.
            let _ = tx.send(event);
        })
    });

    Loading { progress, handle }
}

impl Loading {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the load to end.
    pub async fn finish(self) -> Result<Database> {
        match self.handle.await {
            Ok(ret) => ret,
            Err(err) => Err(Error::from(anyhow::Error::from(err))),
        }
    }
}

impl Database {
    /// Repopulates every buffer from the backing store, table by table.
    ///
    /// Every table is read before any buffer is replaced, so on error all
    /// buffers keep their previous contents. Listeners are not notified;
    /// buffer row indices held from before the reload are meaningless
    /// afterwards.
    ///
    /// # Panics
    ///
    /// Panics inside a change session.
    pub fn init_buffers(&mut self, mut progress: impl FnMut(LoadProgress)) -> Result<()> {
        assert!(
            self.pending.is_none(),
            "buffers cannot be reloaded inside a change session"
        );

        let step = self.config.progress_step;

        let loaded = self
            .tables
            .iter()
            .map(|table| table.load_rows(&mut *self.driver, step, &mut progress))
            .collect::<Result<Vec<_>>>()?;

        for (table, rows) in self.tables.iter_mut().zip(loaded) {
            table.replace_rows(rows);
        }

        Ok(())
    }
}
