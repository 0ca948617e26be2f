//! Namespaced resource identifiers.
//!
//! A [`ResourceId`] names one resource inside a pack as a
//! `(namespace, path)` pair, e.g. `minecraft:optifine/sky/world0/sky1.png`.
//! It is a plain value type: cheap to clone, totally ordered, and usable as
//! a map key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::IdentifierError;

/// The namespace assumed when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

// ---------------------------------------------------------------------------
// ResourceId
// ---------------------------------------------------------------------------

/// A `(namespace, path)` pair uniquely naming a resource in a store.
///
/// Ordering is namespace first, then path, which gives stores and caches a
/// deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Create an identifier from its two halves.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// The namespace, e.g. `"minecraft"`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The slash-separated path inside the namespace.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment, e.g. `"sky1.png"`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// The last path segment without its extension, e.g. `"sky1"`.
    ///
    /// A segment without a dot is returned whole.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(dot) if dot > 0 => &name[..dot],
            _ => name,
        }
    }

    /// Returns `true` if this resource lives strictly below `parent`
    /// (same namespace, path prefixed by `parent.path` plus `/`).
    pub fn is_under(&self, parent: &ResourceId) -> bool {
        self.namespace == parent.namespace
            && self
                .path
                .strip_prefix(parent.path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceId {
    type Err = IdentifierError;

    /// Parse `namespace:path`; a bare `path` gets the default namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = s.split_once(':').unwrap_or((DEFAULT_NAMESPACE, s));
        if namespace.is_empty() || path.is_empty() {
            return Err(IdentifierError::Empty(s.to_owned()));
        }
        Ok(Self::new(namespace, path))
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
