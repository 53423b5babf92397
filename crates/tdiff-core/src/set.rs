//! Differ for unordered collections.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use tdiff_types::{
    DiffResult, DifferOp, Keyer, MatchBy, Presence, SetResult, UpdateError, UpdatePath,
    UpdateResult, UpdateStep,
};
use tracing::debug;

use crate::collection::SetLike;
use crate::differ::{rejected, Differ, DifferRef};
use crate::matching;

enum SetMatch<T> {
    Identity,
    ByKey(Keyer<T>),
}

impl<T> Clone for SetMatch<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::ByKey(keyer) => Self::ByKey(keyer.clone()),
        }
    }
}

/// Compares unordered collections.
///
/// Elements are always paired by key, never by position. The default key is
/// the element itself, so elements match when they are equal; after
/// `MatchBy::ByFunc` they match on a derived key and the item differ explains
/// how the paired elements differ.
pub struct SetDiffer<T, C = HashSet<T>> {
    type_name: Arc<str>,
    item: DifferRef<T>,
    match_by: SetMatch<T>,
    is_ignored: bool,
    _collection: PhantomData<fn() -> C>,
}

impl<T, C> Clone for SetDiffer<T, C> {
    fn clone(&self) -> Self {
        Self {
            type_name: Arc::clone(&self.type_name),
            item: Arc::clone(&self.item),
            match_by: self.match_by.clone(),
            is_ignored: self.is_ignored,
            _collection: PhantomData,
        }
    }
}

impl<T: 'static> SetDiffer<T> {
    /// A differ for `HashSet<T>` comparing elements with `item`.
    pub fn new(item: impl Differ<T> + 'static) -> Self {
        Self::for_collection(item)
    }
}

impl<T: 'static, C: 'static> SetDiffer<T, C> {
    /// A differ for any unordered collection `C` of `T`.
    pub fn for_collection(item: impl Differ<T> + 'static) -> Self {
        Self {
            type_name: Arc::from(std::any::type_name::<C>()),
            item: Arc::new(item),
            match_by: SetMatch::Identity,
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

    fn apply(&self, op: &DifferOp) -> UpdateResult<Self> {
        let mut next = self.clone();
        match op {
            DifferOp::SetIgnored(ignored) => next.is_ignored = *ignored,
            DifferOp::MatchBy(MatchBy::Index) => {
                return Err(UpdateError::InvalidDifferOp {
                    differ: self.type_name.to_string(),
                    op: op.to_string(),
                });
            }
            DifferOp::MatchBy(MatchBy::ByFunc(key_fn)) => {
                next.match_by = SetMatch::ByKey(key_fn.typed::<T>()?);
            }
        }
        debug!(differ = %self.type_name, op = %op, "set differ updated");
        Ok(next)
    }
}

impl<T, C> Differ<C> for SetDiffer<T, C>
where
    T: PartialEq + 'static,
    C: SetLike<T> + 'static,
{
    fn diff(&self, input: Presence<&C>) -> DiffResult {
        let match_type = input.match_type();
        let items = match input {
            Presence::Both(actual, expected) => {
                let (actual, expected) = (actual.elements(), expected.elements());
                match &self.match_by {
                    SetMatch::Identity => {
                        matching::match_by_identity(&actual, &expected, &*self.item)
                    }
                    SetMatch::ByKey(keyer) => {
                        matching::match_by_keyer(&actual, &expected, keyer, &*self.item)
                    }
                }
            }
            Presence::ActualOnly(actual) => actual
                .elements()
                .into_iter()
                .map(|a| self.item.diff(Presence::ActualOnly(a)))
                .collect(),
            Presence::ExpectedOnly(expected) => expected
                .elements()
                .into_iter()
                .map(|e| self.item.diff(Presence::ExpectedOnly(e)))
                .collect(),
        };
        DiffResult::Set(SetResult::new(
            &*self.type_name,
            items,
            match_type,
            self.is_ignored,
        ))
    }

    fn update_with(&self, path: &UpdatePath, op: &DifferOp) -> UpdateResult<DifferRef<C>> {
        let Some((step, rest)) = path.next() else {
            return match self.apply(op) {
                Ok(next) => Ok(Arc::new(next)),
                Err(err) => rejected(err),
            };
        };
        match step {
            UpdateStep::DownTypeParam(0) => {
                debug!(differ = %self.type_name, "routing update into set elements");
                let item = self.item.update_with(&rest, op)?;
                Ok(Arc::new(Self {
                    item,
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
    use crate::leaf::LeafDiffer;
    use crate::record::RecordDiffer;
    use std::collections::BTreeSet;
    use tdiff_types::MatchType;

    #[derive(Debug, PartialEq, Eq, Hash)]
    struct User {
        id: u32,
        name: String,
    }

    fn user(id: u32, name: &str) -> User {
        User { id, name: name.into() }
    }

    fn user_differ() -> RecordDiffer<User> {
        RecordDiffer::builder("User")
            .field("id", |u: &User| &u.id, LeafDiffer::<u32>::equal())
            .field("name", |u: &User| &u.name, LeafDiffer::<String>::equal())
            .build()
    }

    fn set(result: &DiffResult) -> &SetResult {
        result.as_set().expect("set result")
    }

    #[test]
    fn equal_sets_are_ok() {
        let differ = SetDiffer::new(LeafDiffer::<i32>::equal());
        let a: HashSet<i32> = [3, 1, 2].into_iter().collect();
        let b: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert!(differ.diff_pair(&a, &b).is_ok());
    }

    #[test]
    fn missing_and_extra_elements_are_reported() {
        let differ: SetDiffer<i32, BTreeSet<i32>> =
            SetDiffer::for_collection(LeafDiffer::<i32>::equal());
        let a: BTreeSet<i32> = [1, 2, 4].into_iter().collect();
        let b: BTreeSet<i32> = [1, 2, 3].into_iter().collect();

        let result = differ.diff_pair(&a, &b);
        let shapes: Vec<MatchType> = set(&result).items.iter().map(DiffResult::match_type).collect();
        assert_eq!(
            shapes,
            vec![
                MatchType::Both,
                MatchType::Both,
                MatchType::ActualOnly,
                MatchType::ExpectedOnly,
            ]
        );
        assert!(!result.is_ok());
    }

    #[test]
    fn match_by_key_explains_changed_element() {
        let differ = SetDiffer::new(user_differ())
            .update_with(&UpdatePath::root(), &DifferOp::match_by(|u: &User| u.id))
            .unwrap();
        let a: HashSet<User> = [user(1, "ann"), user(2, "bob")].into_iter().collect();
        let b: HashSet<User> = [user(2, "bob"), user(1, "anne")].into_iter().collect();

        let result = differ.diff_pair(&a, &b);
        let items = &set(&result).items;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|r| r.match_type() == MatchType::Both));
        assert_eq!(items.iter().filter(|r| !r.is_ok()).count(), 1);

        let relaxed = differ
            .ignore_at(&UpdatePath::root().each().field("name"))
            .unwrap();
        assert!(relaxed.diff_pair(&a, &b).is_ok());
    }

    #[test]
    fn index_matching_is_rejected() {
        let err = SetDiffer::new(LeafDiffer::<i32>::equal())
            .update_with(&UpdatePath::root(), &DifferOp::match_by_index())
            .err()
            .unwrap();
        assert!(matches!(err, UpdateError::InvalidDifferOp { .. }));
    }

    #[test]
    fn key_function_type_must_match_elements() {
        let err = SetDiffer::new(LeafDiffer::<i32>::equal())
            .update_with(&UpdatePath::root(), &DifferOp::match_by(|u: &User| u.id))
            .err()
            .unwrap();
        assert!(matches!(err, UpdateError::MatchByTypeMismatch { .. }));
    }

    #[test]
    fn ignored_set_is_ok() {
        let differ = SetDiffer::new(LeafDiffer::<i32>::equal()).ignore().unwrap();
        let a: HashSet<i32> = [1].into_iter().collect();
        let b: HashSet<i32> = [2].into_iter().collect();
        let result = differ.diff_pair(&a, &b);
        assert!(result.is_ok());
        assert!(result.is_ignored());
    }

    #[test]
    fn one_sided_set_follows_iteration_order() {
        let differ: SetDiffer<i32, BTreeSet<i32>> =
            SetDiffer::for_collection(LeafDiffer::<i32>::equal());
        let a: BTreeSet<i32> = [3, 1, 2].into_iter().collect();
        let result = differ.diff(Presence::ActualOnly(&a));
        let reprs: Vec<_> = set(&result)
            .items
            .iter()
            .filter_map(|r| r.as_value().and_then(|v| v.actual.clone()))
            .collect();
        assert_eq!(reprs, vec![serde_json::json!(1), serde_json::json!(2), serde_json::json!(3)]);
        assert!(!result.is_ok());
    }

    #[test]
    fn map_step_into_set_is_invalid() {
        let err = SetDiffer::new(LeafDiffer::<i32>::equal())
            .ignore_at(&UpdatePath::root().values())
            .err()
            .unwrap();
        assert!(matches!(err, UpdateError::InvalidTypeParamIndex { index: 1, .. }));
    }
}
