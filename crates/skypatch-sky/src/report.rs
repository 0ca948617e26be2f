//! Per-run failure reports.
//!
//! A [`FailureReport`] collects every entry-scoped [`SkyError`] of a run,
//! keyed by the resource it is charged to. It is returned to the caller
//! rather than raised: one broken sky never stops the others.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use skypatch_pack::identifier::ResourceId;

use crate::SkyError;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Flat category of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A source resource is absent.
    StreamUnavailable,
    /// A properties document is malformed.
    DocumentRead,
    /// An atlas texture could not be decoded.
    ImageDecode,
    /// A face texture could not be encoded.
    ImageEncode,
    /// A document could not be mapped to the output schema.
    Mapping,
}

// ---------------------------------------------------------------------------
// FailureReport
// ---------------------------------------------------------------------------

/// Failures of one conversion run, ordered by resource.
///
/// A resource that fails more than once (a texture shared by several broken
/// entries, say) keeps its latest error.
#[derive(Debug, Default)]
pub struct FailureReport {
    failures: BTreeMap<ResourceId, SkyError>,
}

impl FailureReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// File `error` under the resource it is charged to.
    pub fn record(&mut self, error: SkyError) {
        self.failures.insert(error.resource().clone(), error);
    }

    /// Move every failure of `other` into this report.
    pub fn merge(&mut self, other: FailureReport) {
        self.failures.extend(other.failures);
    }

    /// The error filed under `id`, if any.
    pub fn get(&self, id: &ResourceId) -> Option<&SkyError> {
        self.failures.get(id)
    }

    /// The category of the error filed under `id`, if any.
    pub fn kind_of(&self, id: &ResourceId) -> Option<ErrorKind> {
        self.get(id).map(SkyError::kind)
    }

    /// Number of failed resources.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns `true` if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Iterate over failures in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &SkyError)> {
        self.failures.iter()
    }
}

#[derive(Serialize)]
struct FailureEntry {
    kind: ErrorKind,
    message: String,
}

impl Serialize for FailureReport {
    /// Serializes as `{ "<ns:path>": { "kind": ..., "message": ... } }`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.failures.len()))?;
        for (id, error) in &self.failures {
            let entry = FailureEntry {
                kind: error.kind(),
                message: error.to_string(),
            };
            map.serialize_entry(id, &entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MappingError;

    fn missing(path: &str) -> SkyError {
        SkyError::StreamUnavailable {
            id: ResourceId::new("ns", path),
        }
    }

    #[test]
    fn record_keys_by_resource() {
        let mut report = FailureReport::new();
        assert!(report.is_empty());

        report.record(missing("a.png"));
        report.record(SkyError::Mapping {
            id: ResourceId::new("ns", "b.properties"),
            source: MappingError::MissingField("endFadeOut"),
        });

        assert_eq!(report.len(), 2);
        assert_eq!(
            report.kind_of(&ResourceId::new("ns", "a.png")),
            Some(ErrorKind::StreamUnavailable)
        );
        assert_eq!(
            report.kind_of(&ResourceId::new("ns", "b.properties")),
            Some(ErrorKind::Mapping)
        );
        assert_eq!(report.kind_of(&ResourceId::new("ns", "c")), None);
    }

    #[test]
    fn repeated_failure_keeps_one_entry() {
        let mut report = FailureReport::new();
        report.record(missing("shared.png"));
        report.record(missing("shared.png"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn merge_combines_reports() {
        let mut first = FailureReport::new();
        first.record(missing("a.png"));
        let mut second = FailureReport::new();
        second.record(missing("b.png"));

        first.merge(second);
        let ids: Vec<String> = first.iter().map(|(id, _)| id.to_string()).collect();
        assert_eq!(ids, ["ns:a.png", "ns:b.png"]);
    }

    #[test]
    fn serializes_kind_and_message() {
        let mut report = FailureReport::new();
        report.record(missing("a.png"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ns:a.png"]["kind"], "stream_unavailable");
        assert_eq!(json["ns:a.png"]["message"], "resource ns:a.png is not available");
    }
}
