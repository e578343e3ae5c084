//! Build-once access to the process-wide store.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::info;

use crate::{
    loader::{self, DataError},
    store::DataStore,
};

/// Lazy, guarded owner of a [`DataStore`].
///
/// The first caller of [`SharedStore::get`] performs the build; concurrent
/// callers block on the cell and then observe the same fully-built store. A
/// failed build publishes nothing, so the next call retries the load from
/// the backing directory.
///
/// Tests construct a fresh `SharedStore` per case instead of sharing a
/// module-level global.
#[derive(Debug)]
pub struct SharedStore {
    dir: PathBuf,
    cell: OnceCell<DataStore>,
}

impl SharedStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the store, building it on first use.
    pub fn get(&self) -> Result<&DataStore, DataError> {
        self.cell.get_or_try_init(|| {
            let raw = loader::load_dir(&self.dir)?;
            let store = DataStore::build(raw)?;

            info!(
                meps = store.meps().len(),
                votes = store.votes().len(),
                "dataset loaded"
            );

            Ok(store)
        })
    }
}
