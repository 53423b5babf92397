//! Differ for keyed collections.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tdiff_types::{
    DiffResult, DifferOp, MapEntry, MapResult, Presence, UpdateError, UpdatePath, UpdateResult,
    UpdateStep,
};
use tracing::debug;

use crate::collection::MapLike;
use crate::differ::{rejected, Differ, DifferRef};
use crate::leaf::LeafDiffer;

/// Index of the value slot addressed by `DownTypeParam`.
const VALUE_PARAM: usize = 1;

/// Compares keyed collections.
///
/// Entries are partitioned into keys present only in the actual map, keys
/// present in both, and keys present only in the expected map. Each bucket
/// keeps its map's iteration order, and the result lists them in that order:
/// actual-only, both, expected-only. Keys are rendered through the key
/// comparator; only the value differ can be reconfigured.
pub struct MapDiffer<K, V, M = HashMap<K, V>> {
    type_name: Arc<str>,
    key: LeafDiffer<K>,
    value: DifferRef<V>,
    is_ignored: bool,
    _collection: PhantomData<fn() -> M>,
}

impl<K, V, M> Clone for MapDiffer<K, V, M> {
    fn clone(&self) -> Self {
        Self {
            type_name: Arc::clone(&self.type_name),
            key: self.key.clone(),
            value: Arc::clone(&self.value),
            is_ignored: self.is_ignored,
            _collection: PhantomData,
        }
    }
}

impl<K: 'static, V: 'static> MapDiffer<K, V> {
    /// A differ for `HashMap<K, V>`.
    pub fn new(key: LeafDiffer<K>, value: impl Differ<V> + 'static) -> Self {
        Self::for_collection(key, value)
    }
}

impl<K: 'static, V: 'static, M: 'static> MapDiffer<K, V, M> {
    /// A differ for any keyed collection `M`.
    pub fn for_collection(key: LeafDiffer<K>, value: impl Differ<V> + 'static) -> Self {
        Self {
            type_name: Arc::from(std::any::type_name::<M>()),
            key,
            value: Arc::new(value),
            is_ignored: false,
            _collection: PhantomData,
        }
    }

    /// Override the type name recorded in results.
    pub fn named(mut self, type_name: impl AsRef<str>) -> Self {
        self.type_name = Arc::from(type_name.as_ref());
        self
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    /// Render a key by diffing it one-sided through the key comparator.
    fn key_repr(&self, key: &K) -> Value {
        self.key
            .diff_value(Presence::ActualOnly(key))
            .actual
            .unwrap_or(Value::Null)
    }

    fn entry(&self, key: &K, values: Presence<&V>) -> MapEntry {
        MapEntry {
            key: self.key_repr(key),
            result: self.value.diff(values),
        }
    }
}

impl<K, V, M> Differ<M> for MapDiffer<K, V, M>
where
    K: 'static,
    V: 'static,
    M: MapLike<K, V> + 'static,
{
    fn diff(&self, input: Presence<&M>) -> DiffResult {
        let match_type = input.match_type();
        let entries = match input {
            Presence::Both(actual, expected) => {
                let mut actual_only = Vec::new();
                let mut both = Vec::new();
                for (key, av) in actual.entries() {
                    match expected.lookup(key) {
                        Some(ev) => both.push(self.entry(key, Presence::Both(av, ev))),
                        None => actual_only.push(self.entry(key, Presence::ActualOnly(av))),
                    }
                }
                let expected_only = expected
                    .entries()
                    .into_iter()
                    .filter(|(key, _)| actual.lookup(key).is_none())
                    .map(|(key, ev)| self.entry(key, Presence::ExpectedOnly(ev)));

                actual_only.extend(both);
                actual_only.extend(expected_only);
                actual_only
            }
            Presence::ActualOnly(actual) => actual
                .entries()
                .into_iter()
                .map(|(key, av)| self.entry(key, Presence::ActualOnly(av)))
                .collect(),
            Presence::ExpectedOnly(expected) => expected
                .entries()
                .into_iter()
                .map(|(key, ev)| self.entry(key, Presence::ExpectedOnly(ev)))
                .collect(),
        };
        DiffResult::Map(MapResult::new(
            &*self.type_name,
            entries,
            match_type,
            self.is_ignored,
        ))
    }

    fn update_with(&self, path: &UpdatePath, op: &DifferOp) -> UpdateResult<DifferRef<M>> {
        let Some((step, rest)) = path.next() else {
            return match op {
                DifferOp::SetIgnored(ignored) => {
                    debug!(differ = %self.type_name, ignored, "map ignored flag set");
                    Ok(Arc::new(Self {
                        is_ignored: *ignored,
                        ..self.clone()
                    }))
                }
                DifferOp::MatchBy(_) => rejected(UpdateError::InvalidDifferOp {
                    differ: self.type_name.to_string(),
                    op: op.to_string(),
                }),
            };
        };
        match step {
            UpdateStep::DownTypeParam(VALUE_PARAM) => {
                debug!(differ = %self.type_name, "routing update into map values");
                let value = self.value.update_with(&rest, op)?;
                Ok(Arc::new(Self {
                    value,
                    ..self.clone()
                }))
            }
            UpdateStep::DownTypeParam(index) => rejected(UpdateError::InvalidTypeParamIndex {
                differ: self.type_name.to_string(),
                index: *index,
            }),
            UpdateStep::RecordField(_) | UpdateStep::DownSubtype(_) => {
                rejected(UpdateError::UnexpectedDifferType {
                    differ: self.type_name.to_string(),
                    step: step.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::SeqDiffer;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tdiff_types::MatchType;

    type Scores = BTreeMap<String, i32>;

    fn scores(pairs: &[(&str, i32)]) -> Scores {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn differ() -> MapDiffer<String, i32, Scores> {
        MapDiffer::for_collection(LeafDiffer::<String>::equal(), LeafDiffer::<i32>::equal())
    }

    fn map(result: &DiffResult) -> &MapResult {
        result.as_map().expect("map result")
    }

    #[test]
    fn partitions_keys_into_buckets() {
        let result = differ().diff_pair(&scores(&[("a", 1), ("b", 2)]), &scores(&[("b", 2), ("c", 3)]));
        let m = map(&result);

        assert_eq!(m.entries.len(), 3);
        assert_eq!(m.entries[0].key, json!("a"));
        assert_eq!(m.entries[0].result.match_type(), MatchType::ActualOnly);
        assert_eq!(m.entries[1].key, json!("b"));
        assert!(m.entries[1].result.is_ok());
        assert_eq!(m.entries[2].key, json!("c"));
        assert_eq!(m.entries[2].result.match_type(), MatchType::ExpectedOnly);

        assert_eq!(m.actual_only().count(), 1);
        assert_eq!(m.expected_only().count(), 1);
        assert_eq!(m.both().count(), 1);
        assert!(!m.is_ok);
    }

    #[test]
    fn identical_maps_are_ok() {
        let s = scores(&[("a", 1), ("b", 2)]);
        assert!(differ().diff_pair(&s, &s).is_ok());
    }

    #[test]
    fn changed_value_fails_map() {
        let result = differ().diff_pair(&scores(&[("a", 1)]), &scores(&[("a", 2)]));
        let m = map(&result);
        assert!(!m.is_ok);
        let value = m.get(&json!("a")).and_then(DiffResult::as_value).unwrap();
        assert_eq!(value.actual, Some(json!(1)));
        assert_eq!(value.expected, Some(json!(2)));
    }

    #[test]
    fn ignored_values_still_require_same_keys() {
        let relaxed = differ().ignore_at(&UpdatePath::root().values()).unwrap();
        assert!(relaxed
            .diff_pair(&scores(&[("a", 1)]), &scores(&[("a", 9)]))
            .is_ok());
        assert!(!relaxed
            .diff_pair(&scores(&[("a", 1)]), &scores(&[("b", 1)]))
            .is_ok());
    }

    #[test]
    fn ignored_map_is_ok() {
        let ignored = differ().ignore().unwrap();
        assert!(ignored
            .diff_pair(&scores(&[("a", 1)]), &scores(&[("b", 1)]))
            .is_ok());
    }

    #[test]
    fn one_sided_map_lists_every_entry() {
        let result = differ().diff(Presence::ExpectedOnly(&scores(&[("x", 1), ("y", 2)])));
        let m = map(&result);
        assert_eq!(m.expected_only().count(), 2);
        assert_eq!(m.match_type, MatchType::ExpectedOnly);
        assert!(!m.is_ok);

        let empty = differ().diff(Presence::ActualOnly(&Scores::new()));
        assert!(empty.is_ok());
    }

    #[test]
    fn key_param_is_not_reconfigurable() {
        let err = differ()
            .ignore_at(&UpdatePath::root().each())
            .err()
            .unwrap();
        assert!(matches!(err, UpdateError::InvalidTypeParamIndex { index: 0, .. }));
    }

    #[test]
    fn match_by_on_map_is_invalid() {
        let err = differ()
            .update_with(&UpdatePath::root(), &DifferOp::match_by_index())
            .err()
            .unwrap();
        assert!(matches!(err, UpdateError::InvalidDifferOp { .. }));
    }

    #[test]
    fn updates_route_through_nested_values() {
        let nested: MapDiffer<String, Vec<i32>> =
            MapDiffer::new(LeafDiffer::<String>::equal(), SeqDiffer::new(LeafDiffer::<i32>::equal()));
        let unordered = nested
            .update_with(
                &UpdatePath::root().values(),
                &DifferOp::match_by(|v: &i32| *v),
            )
            .unwrap();

        let a: HashMap<String, Vec<i32>> = [("k".to_string(), vec![1, 2])].into_iter().collect();
        let b: HashMap<String, Vec<i32>> = [("k".to_string(), vec![2, 1])].into_iter().collect();
        assert!(!nested.diff_pair(&a, &b).is_ok());
        assert!(unordered.diff_pair(&a, &b).is_ok());
    }
}
