//! Staging area for generated artifacts.
//!
//! The [`OutputCache`] holds every manifest and face texture produced during
//! a run and writes them out in one batch at the end. Insertion is
//! first-writer-wins: face textures derived again from the same atlas are
//! identical, so a repeated insert is a no-op rather than an overwrite.

use std::collections::BTreeMap;

use skypatch_pack::identifier::ResourceId;
use skypatch_pack::store::{ResourceKind, ResourceStore};
use skypatch_pack::StoreError;

/// Generated artifacts awaiting a flush, keyed by output identifier.
#[derive(Debug, Default)]
pub struct OutputCache {
    artifacts: BTreeMap<ResourceId, Vec<u8>>,
}

impl OutputCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `bytes` under `id` unless `id` is already staged.
    ///
    /// Returns `true` if the artifact was inserted, `false` if an earlier one
    /// was kept.
    pub fn insert(&mut self, id: ResourceId, bytes: Vec<u8>) -> bool {
        if self.artifacts.contains_key(&id) {
            return false;
        }
        self.artifacts.insert(id, bytes);
        true
    }

    /// Returns `true` if `id` is staged.
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.artifacts.contains_key(id)
    }

    /// The staged bytes for `id`.
    pub fn get(&self, id: &ResourceId) -> Option<&[u8]> {
        self.artifacts.get(id).map(Vec::as_slice)
    }

    /// Number of staged artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Staged identifiers in output order.
    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.artifacts.keys()
    }

    /// Write every staged artifact to `output` exactly once, in identifier
    /// order, and empty the cache.
    ///
    /// Returns the number of artifacts written. On a write error the
    /// remaining artifacts are discarded and the error is returned.
    pub fn flush(&mut self, output: &mut dyn ResourceStore) -> Result<usize, StoreError> {
        let artifacts = std::mem::take(&mut self.artifacts);
        let count = artifacts.len();
        for (id, bytes) in artifacts {
            output.write(ResourceKind::Assets, &id, &bytes)?;
        }
        tracing::info!(count, "flushed generated artifacts");
        Ok(count)
    }
}

impl Drop for OutputCache {
    fn drop(&mut self) {
        if !self.artifacts.is_empty() {
            tracing::warn!(
                count = self.artifacts.len(),
                "output cache dropped with unflushed artifacts"
            );
        }
    }
}
