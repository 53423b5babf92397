//! The result tree produced by a comparison.
//!
//! Results mirror the shape of the differ tree that produced them. Every node
//! records its own `is_ok` verdict, computed bottom-up, together with the
//! presence of its inputs and whether it was ignored. The tree is plain data:
//! it holds no handles back into differs and serializes with serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::presence::{MatchType, Presence};

/// A node of the result tree, one variant per differ kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffResult {
    Value(ValueResult),
    Record(RecordResult),
    List(ListResult),
    Set(SetResult),
    Map(MapResult),
}

impl DiffResult {
    /// Whether this node (and everything below it) counts as a match.
    ///
    /// The root's `is_ok` is the single pass/fail verdict of a comparison.
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Value(r) => r.is_ok,
            Self::Record(r) => r.is_ok,
            Self::List(r) => r.is_ok,
            Self::Set(r) => r.is_ok,
            Self::Map(r) => r.is_ok,
        }
    }

    pub fn is_ignored(&self) -> bool {
        match self {
            Self::Value(r) => r.is_ignored,
            Self::Record(r) => r.is_ignored,
            Self::List(r) => r.is_ignored,
            Self::Set(r) => r.is_ignored,
            Self::Map(r) => r.is_ignored,
        }
    }

    pub fn match_type(&self) -> MatchType {
        match self {
            Self::Value(r) => r.match_type,
            Self::Record(r) => r.match_type,
            Self::List(r) => r.match_type,
            Self::Set(r) => r.match_type,
            Self::Map(r) => r.match_type,
        }
    }

    /// Name of the compared type, for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Value(r) => &r.type_name,
            Self::Record(r) => &r.type_name,
            Self::List(r) => &r.type_name,
            Self::Set(r) => &r.type_name,
            Self::Map(r) => &r.type_name,
        }
    }

    pub fn as_value(&self) -> Option<&ValueResult> {
        match self {
            Self::Value(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordResult> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListResult> {
        match self {
            Self::List(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetResult> {
        match self {
            Self::Set(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapResult> {
        match self {
            Self::Map(r) => Some(r),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ValueResult
// ---------------------------------------------------------------------------

/// Leaf result holding the scalar representation of each present side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueResult {
    pub type_name: String,
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    pub is_ok: bool,
    pub is_ignored: bool,
    pub match_type: MatchType,
}

impl ValueResult {
    /// Create a leaf result from the representations of the present sides.
    pub fn new(
        type_name: impl Into<String>,
        reprs: Presence<Value>,
        is_ok: bool,
        is_ignored: bool,
    ) -> Self {
        let match_type = reprs.match_type();
        let (actual, expected) = match reprs {
            Presence::Both(a, e) => (Some(a), Some(e)),
            Presence::ActualOnly(a) => (Some(a), None),
            Presence::ExpectedOnly(e) => (None, Some(e)),
        };
        Self {
            type_name: type_name.into(),
            actual,
            expected,
            is_ok,
            is_ignored,
            match_type,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordResult
// ---------------------------------------------------------------------------

/// Result for a fixed-shape record: one child per field, in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub type_name: String,
    pub fields: Vec<(String, DiffResult)>,
    pub is_ok: bool,
    pub is_ignored: bool,
    pub match_type: MatchType,
}

impl RecordResult {
    /// Look up a field's result by name.
    pub fn get(&self, field: &str) -> Option<&DiffResult> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, result)| result)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

// ---------------------------------------------------------------------------
// ListResult / SetResult
// ---------------------------------------------------------------------------

/// Result for an ordered collection. Items appear in match order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    pub type_name: String,
    pub items: Vec<DiffResult>,
    pub is_ok: bool,
    pub is_ignored: bool,
    pub match_type: MatchType,
}

impl ListResult {
    /// Build a list result; `is_ok` holds when ignored or every item is ok.
    pub fn new(
        type_name: impl Into<String>,
        items: Vec<DiffResult>,
        match_type: MatchType,
        is_ignored: bool,
    ) -> Self {
        let is_ok = is_ignored || items.iter().all(DiffResult::is_ok);
        Self {
            type_name: type_name.into(),
            items,
            is_ok,
            is_ignored,
            match_type,
        }
    }
}

/// Result for an unordered collection. Items appear in match order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetResult {
    pub type_name: String,
    pub items: Vec<DiffResult>,
    pub is_ok: bool,
    pub is_ignored: bool,
    pub match_type: MatchType,
}

impl SetResult {
    /// Build a set result; `is_ok` holds when ignored or every item is ok.
    pub fn new(
        type_name: impl Into<String>,
        items: Vec<DiffResult>,
        match_type: MatchType,
        is_ignored: bool,
    ) -> Self {
        let is_ok = is_ignored || items.iter().all(DiffResult::is_ok);
        Self {
            type_name: type_name.into(),
            items,
            is_ok,
            is_ignored,
            match_type,
        }
    }
}

// ---------------------------------------------------------------------------
// MapResult
// ---------------------------------------------------------------------------

/// One entry of a map comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    /// Scalar representation of the key.
    pub key: Value,
    pub result: DiffResult,
}

/// Result for a keyed collection.
///
/// Entries are ordered actual-only, then shared keys, then expected-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapResult {
    pub type_name: String,
    pub entries: Vec<MapEntry>,
    pub is_ok: bool,
    pub is_ignored: bool,
    pub match_type: MatchType,
}

impl MapResult {
    /// Build a map result.
    ///
    /// A map is ok when ignored, or when every entry has a key on both sides
    /// and every such entry is ok. A missing or extra key always fails the
    /// map, even if the value differ itself is ignored.
    pub fn new(
        type_name: impl Into<String>,
        entries: Vec<MapEntry>,
        match_type: MatchType,
        is_ignored: bool,
    ) -> Self {
        let is_ok = is_ignored
            || entries
                .iter()
                .all(|e| e.result.match_type() == MatchType::Both && e.result.is_ok());
        Self {
            type_name: type_name.into(),
            entries,
            is_ok,
            is_ignored,
            match_type,
        }
    }

    /// Entries whose key exists only on the actual side.
    pub fn actual_only(&self) -> impl Iterator<Item = &MapEntry> {
        self.entries_with(MatchType::ActualOnly)
    }

    /// Entries whose key exists only on the expected side.
    pub fn expected_only(&self) -> impl Iterator<Item = &MapEntry> {
        self.entries_with(MatchType::ExpectedOnly)
    }

    /// Entries whose key exists on both sides.
    pub fn both(&self) -> impl Iterator<Item = &MapEntry> {
        self.entries_with(MatchType::Both)
    }

    /// Find an entry by its key representation.
    pub fn get(&self, key: &Value) -> Option<&DiffResult> {
        self.entries.iter().find(|e| &e.key == key).map(|e| &e.result)
    }

    fn entries_with(&self, match_type: MatchType) -> impl Iterator<Item = &MapEntry> {
        self.entries
            .iter()
            .filter(move |e| e.result.match_type() == match_type)
    }
}
