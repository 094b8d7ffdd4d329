use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::assembler::load_quantity;
use super::error::DataResult;
use super::model::{Quantity, QuantityDataset};

/// Loaded datasets keyed by `(folder, quantity)`, so switching views does not
/// re-read result files. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<(PathBuf, Quantity), Arc<QuantityDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, folder: &Path, quantity: Quantity) -> DataResult<Arc<QuantityDataset>> {
        let key = (folder.to_path_buf(), quantity);
        if let Some(hit) = self.entries.get(&key) {
            log::debug!("cache hit for {} in {}", quantity, folder.display());
            return Ok(Arc::clone(hit));
        }
        let dataset = Arc::new(load_quantity(folder, quantity)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, folder: &Path, quantity: Quantity) -> bool {
        self.entries.contains_key(&(folder.to_path_buf(), quantity))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
