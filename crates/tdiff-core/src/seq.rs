//! Differ for ordered collections.

use std::marker::PhantomData;
use std::sync::Arc;

use tdiff_types::{
    DiffResult, DifferOp, Keyer, ListResult, MatchBy, Presence, UpdateError, UpdatePath,
    UpdateResult, UpdateStep,
};
use tracing::debug;

use crate::collection::SeqLike;
use crate::differ::{rejected, Differ, DifferRef};
use crate::matching;

enum SeqMatch<T> {
    Index,
    ByKey(Keyer<T>),
}

impl<T> Clone for SeqMatch<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Index => Self::Index,
            Self::ByKey(keyer) => Self::ByKey(keyer.clone()),
        }
    }
}

/// Compares ordered collections element by element.
///
/// Elements are paired by position by default. Positions present on only
/// one side yield one-sided item results, so a length mismatch fails the
/// comparison through those padded slots. After `MatchBy::ByFunc`, elements
/// are paired by key with the greedy matching in [`crate::matching`].
pub struct SeqDiffer<T, C = Vec<T>> {
    type_name: Arc<str>,
    item: DifferRef<T>,
    match_by: SeqMatch<T>,
    is_ignored: bool,
    _collection: PhantomData<fn() -> C>,
}

impl<T, C> Clone for SeqDiffer<T, C> {
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

impl<T: 'static> SeqDiffer<T> {
    /// A differ for `Vec<T>` comparing elements with `item`.
    pub fn new(item: impl Differ<T> + 'static) -> Self {
        Self::for_collection(item)
    }
}

impl<T: 'static, C: 'static> SeqDiffer<T, C> {
    /// A differ for any ordered collection `C` of `T`.
    pub fn for_collection(item: impl Differ<T> + 'static) -> Self {
        Self {
            type_name: Arc::from(std::any::type_name::<C>()),
            item: Arc::new(item),
            match_by: SeqMatch::Index,
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

    /// Returns `true` if elements are paired by position.
    pub fn matches_by_index(&self) -> bool {
        matches!(self.match_by, SeqMatch::Index)
    }

    fn diff_by_index(&self, actual: &[&T], expected: &[&T]) -> Vec<DiffResult> {
        let len = actual.len().max(expected.len());
        (0..len)
            .filter_map(|i| {
                Presence::from_options(actual.get(i).copied(), expected.get(i).copied())
            })
            .map(|pair| self.item.diff(pair))
            .collect()
    }

    fn apply(&self, op: &DifferOp) -> UpdateResult<Self> {
        let mut next = self.clone();
        match op {
            DifferOp::SetIgnored(ignored) => next.is_ignored = *ignored,
            DifferOp::MatchBy(MatchBy::Index) => next.match_by = SeqMatch::Index,
            DifferOp::MatchBy(MatchBy::ByFunc(key_fn)) => {
                next.match_by = SeqMatch::ByKey(key_fn.typed::<T>()?);
            }
        }
        debug!(differ = %self.type_name, op = %op, "sequence differ updated");
        Ok(next)
    }
}

impl<T, C> Differ<C> for SeqDiffer<T, C>
where
    T: 'static,
    C: SeqLike<T> + 'static,
{
    fn diff(&self, input: Presence<&C>) -> DiffResult {
        let match_type = input.match_type();
        let items = match input {
            Presence::Both(actual, expected) => {
                let (actual, expected) = (actual.elements(), expected.elements());
                match &self.match_by {
                    SeqMatch::Index => self.diff_by_index(&actual, &expected),
                    SeqMatch::ByKey(keyer) => {
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
        DiffResult::List(ListResult::new(
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
                debug!(differ = %self.type_name, "routing update into sequence elements");
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
