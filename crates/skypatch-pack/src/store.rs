//! Resource stores: where converters read packs from and write packs to.
//!
//! The [`ResourceStore`] trait is the only view a converter has of a pack.
//! Resources are addressed by a [`ResourceKind`] (client `assets` or server
//! `data`) and a [`ResourceId`].
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`]: an ordered in-memory map. Used in tests and as a
//!   staging sink.
//! - [`DirectoryStore`]: an unpacked resource pack on disk, laid out as
//!   `<root>/<kind>/<namespace>/<path>`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::identifier::ResourceId;
use crate::StoreError;

// ---------------------------------------------------------------------------
// ResourceKind
// ---------------------------------------------------------------------------

/// The top-level section of a pack a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Client resources (`assets/`): textures, models, sky definitions.
    Assets,
    /// Server data (`data/`).
    Data,
}

impl ResourceKind {
    /// The directory name this kind is stored under.
    pub fn directory(self) -> &'static str {
        match self {
            ResourceKind::Assets => "assets",
            ResourceKind::Data => "data",
        }
    }
}

// ---------------------------------------------------------------------------
// ResourceStore
// ---------------------------------------------------------------------------

/// A namespaced virtual filesystem.
///
/// Reads report absence as `None` rather than an error: a missing texture
/// is an ordinary per-entry failure for the caller to record, not a store
/// fault.
pub trait ResourceStore {
    /// All namespaces that hold at least one resource of `kind`.
    fn namespaces(&self, kind: ResourceKind) -> BTreeSet<String>;

    /// Every resource of `kind` located below `parent`, in path order.
    fn search<'a>(
        &'a self,
        kind: ResourceKind,
        parent: &ResourceId,
    ) -> Box<dyn Iterator<Item = ResourceId> + 'a>;

    /// The raw bytes of a resource, or `None` if it does not exist.
    fn read(&self, kind: ResourceKind, id: &ResourceId) -> Option<Vec<u8>>;

    /// Store `bytes` under `id`, replacing any previous content.
    fn write(&mut self, kind: ResourceKind, id: &ResourceId, bytes: &[u8])
        -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-memory [`ResourceStore`] backed by an ordered map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    resources: BTreeMap<(ResourceKind, ResourceId), Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource.
    pub fn insert(&mut self, kind: ResourceKind, id: ResourceId, bytes: Vec<u8>) {
        self.resources.insert((kind, id), bytes);
    }

    /// Borrow the bytes of a resource without copying.
    pub fn get(&self, kind: ResourceKind, id: &ResourceId) -> Option<&[u8]> {
        self.resources
            .get(&(kind, id.clone()))
            .map(Vec::as_slice)
    }

    /// Number of stored resources across all kinds.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterate over the identifiers of all resources of `kind`.
    pub fn ids(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceId> {
        self.resources
            .keys()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, id)| id)
    }
}

impl ResourceStore for MemoryStore {
    fn namespaces(&self, kind: ResourceKind) -> BTreeSet<String> {
        self.ids(kind).map(|id| id.namespace().to_owned()).collect()
    }

    fn search<'a>(
        &'a self,
        kind: ResourceKind,
        parent: &ResourceId,
    ) -> Box<dyn Iterator<Item = ResourceId> + 'a> {
        let parent = parent.clone();
        Box::new(
            self.ids(kind)
                .filter(move |id| id.is_under(&parent))
                .cloned(),
        )
    }

    fn read(&self, kind: ResourceKind, id: &ResourceId) -> Option<Vec<u8>> {
        self.get(kind, id).map(<[u8]>::to_vec)
    }

    fn write(
        &mut self,
        kind: ResourceKind,
        id: &ResourceId,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        self.insert(kind, id.clone(), bytes.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DirectoryStore
// ---------------------------------------------------------------------------

/// A [`ResourceStore`] over an unpacked resource pack directory.
///
/// A resource `(kind, namespace:path)` lives at
/// `<root>/<kind>/<namespace>/<path>`. Identifiers whose path would escape
/// the root (`..` segments, absolute paths) are never read and are rejected
/// on write.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open a store rooted at `root`. The directory does not need to exist
    /// yet; it is created on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The pack root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an identifier to its file path, or `None` if the identifier
    /// would escape the root.
    fn resolve(&self, kind: ResourceKind, id: &ResourceId) -> Option<PathBuf> {
        let relative = Path::new(id.namespace()).join(id.path());
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        contained.then(|| self.root.join(kind.directory()).join(relative))
    }
}

/// Recursively collect files below `dir` as `/`-joined paths relative to
/// `base`. Unreadable directories are logged and skipped, and symlinked
/// directories are not followed.
fn collect_files(base: &Path, dir: &Path, out: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to list directory -- skipping");
            }
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_files(base, &path, out);
            continue;
        }
        if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "not following directory symlink");
            continue;
        }
        let Ok(relative) = path.strip_prefix(base) else {
            continue;
        };
        let segments: Option<Vec<&str>> = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect();
        match segments {
            Some(segments) => out.push(segments.join("/")),
            None => {
                tracing::debug!(path = %path.display(), "skipping non UTF-8 file name");
            }
        }
    }
}

impl ResourceStore for DirectoryStore {
    fn namespaces(&self, kind: ResourceKind) -> BTreeSet<String> {
        let Ok(entries) = fs::read_dir(self.root.join(kind.directory())) else {
            return BTreeSet::new();
        };
        entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .collect()
    }

    fn search<'a>(
        &'a self,
        kind: ResourceKind,
        parent: &ResourceId,
    ) -> Box<dyn Iterator<Item = ResourceId> + 'a> {
        let Some(parent_dir) = self.resolve(kind, parent) else {
            return Box::new(std::iter::empty());
        };
        let namespace_dir = self.root.join(kind.directory()).join(parent.namespace());

        let mut paths = Vec::new();
        collect_files(&namespace_dir, &parent_dir, &mut paths);
        paths.sort();

        let namespace = parent.namespace().to_owned();
        Box::new(
            paths
                .into_iter()
                .map(move |path| ResourceId::new(namespace.clone(), path)),
        )
    }

    fn read(&self, kind: ResourceKind, id: &ResourceId) -> Option<Vec<u8>> {
        let path = self.resolve(kind, id)?;
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(resource = %id, error = %e, "failed to read resource -- treating as absent");
                None
            }
        }
    }

    fn write(
        &mut self,
        kind: ResourceKind,
        id: &ResourceId,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        let path = self
            .resolve(kind, id)
            .ok_or_else(|| StoreError::InvalidPath { id: id.clone() })?;
        let io_error = |source| StoreError::Io {
            id: id.clone(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        fs::write(&path, bytes).map_err(io_error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
