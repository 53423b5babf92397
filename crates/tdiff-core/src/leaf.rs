//! Scalar differs.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tdiff_types::{DiffResult, DifferOp, Presence, UpdateError, UpdatePath, UpdateResult, ValueResult};
use tracing::debug;

use crate::differ::{rejected, Differ, DifferRef};
use crate::repr::{json_repr, NumericEquiv};

/// A differ for scalar values.
///
/// A leaf compares two values with an equivalence function and records each
/// present side through a representation function. Leaves have no children:
/// the only update they accept is `SetIgnored` at the empty path.
pub struct LeafDiffer<T> {
    type_name: Arc<str>,
    is_ignored: bool,
    equiv: Arc<dyn Fn(&T, &T) -> bool + Send + Sync>,
    repr: Arc<dyn Fn(&T) -> Value + Send + Sync>,
}

impl<T> Clone for LeafDiffer<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: Arc::clone(&self.type_name),
            is_ignored: self.is_ignored,
            equiv: Arc::clone(&self.equiv),
            repr: Arc::clone(&self.repr),
        }
    }
}

impl<T: PartialEq + Serialize + 'static> LeafDiffer<T> {
    /// Compare with `==`.
    pub fn equal() -> Self {
        Self::with_repr(|a: &T, b: &T| a == b, json_repr::<T>)
    }
}

impl<T: NumericEquiv + Serialize + 'static> LeafDiffer<T> {
    /// Compare with [`NumericEquiv`].
    pub fn numeric() -> Self {
        Self::with_repr(|a: &T, b: &T| a.num_equiv(b), json_repr::<T>)
    }
}

impl<T: 'static> LeafDiffer<T> {
    /// Build a leaf from an equivalence and a representation function.
    pub fn with_repr(
        equiv: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
        repr: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_name: Arc::from(std::any::type_name::<T>()),
            is_ignored: false,
            equiv: Arc::new(equiv),
            repr: Arc::new(repr),
        }
    }
}

impl<T> LeafDiffer<T> {
    /// Override the type name recorded in results.
    pub fn named(mut self, type_name: impl AsRef<str>) -> Self {
        self.type_name = Arc::from(type_name.as_ref());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    /// A copy of this differ with the ignored flag set to `ignored`.
    pub fn set_ignored(&self, ignored: bool) -> Self {
        Self {
            is_ignored: ignored,
            ..self.clone()
        }
    }

    /// The representation of `value` carried by results.
    pub fn repr(&self, value: &T) -> Value {
        (self.repr)(value)
    }

    /// Compare `input`, returning the leaf result directly.
    pub fn diff_value(&self, input: Presence<&T>) -> ValueResult {
        let is_ok = match input {
            Presence::Both(actual, expected) => self.is_ignored || (self.equiv)(actual, expected),
            Presence::ActualOnly(_) | Presence::ExpectedOnly(_) => self.is_ignored,
        };
        ValueResult::new(
            &*self.type_name,
            input.map(|v| self.repr(v)),
            is_ok,
            self.is_ignored,
        )
    }
}

impl<T: 'static> Differ<T> for LeafDiffer<T> {
    fn diff(&self, input: Presence<&T>) -> DiffResult {
        DiffResult::Value(self.diff_value(input))
    }

    fn update_with(&self, path: &UpdatePath, op: &DifferOp) -> UpdateResult<DifferRef<T>> {
        if !path.is_empty() {
            return rejected(UpdateError::PathTooLong {
                differ: self.type_name.to_string(),
                remaining: path.to_string(),
            });
        }
        match op {
            DifferOp::SetIgnored(ignored) => {
                debug!(differ = %self.type_name, ignored, "leaf ignored flag set");
                Ok(Arc::new(self.set_ignored(*ignored)))
            }
            DifferOp::MatchBy(_) => rejected(UpdateError::InvalidDifferOp {
                differ: self.type_name.to_string(),
                op: op.to_string(),
            }),
        }
    }
}
