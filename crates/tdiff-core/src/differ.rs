use std::sync::Arc;

use tdiff_types::{DiffResult, DifferOp, Presence, UpdateError, UpdatePath, UpdateResult};
use tracing::debug;

/// Shared handle to a type-erased differ.
pub type DifferRef<T> = Arc<dyn Differ<T>>;

/// A comparator for values of type `T`.
///
/// Implementations must satisfy these invariants:
/// - Differs are immutable. `update_with` returns a new differ and never
///   changes `self`; untouched children are shared, not copied.
/// - `diff` is a pure function of the differ and its input. It never fails:
///   every well-typed input produces a result.
/// - A value present on one side only is never ok unless the node is ignored.
/// - An ignored node is always ok, whatever its children report.
pub trait Differ<T>: Send + Sync {
    /// Compare the present sides of `input`.
    fn diff(&self, input: Presence<&T>) -> DiffResult;

    /// Walk `path` and apply `op` to the differ it addresses.
    ///
    /// Returns a new differ tree; fails without partial effect when the path
    /// does not fit this tree or the addressed differ rejects `op`.
    fn update_with(&self, path: &UpdatePath, op: &DifferOp) -> UpdateResult<DifferRef<T>>;

    /// Compare an actual value against an expected one.
    fn diff_pair(&self, actual: &T, expected: &T) -> DiffResult {
        self.diff(Presence::Both(actual, expected))
    }

    /// Mark the differ at `path` as ignored.
    fn ignore_at(&self, path: &UpdatePath) -> UpdateResult<DifferRef<T>> {
        self.update_with(path, &DifferOp::SetIgnored(true))
    }

    /// Mark this differ as ignored.
    fn ignore(&self) -> UpdateResult<DifferRef<T>> {
        self.ignore_at(&UpdatePath::root())
    }

    /// Like [`Differ::update_with`], for paths known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if the update fails. A failure here is a construction bug in
    /// the caller's differ configuration, not a comparison outcome.
    fn update_unchecked(&self, path: &UpdatePath, op: &DifferOp) -> DifferRef<T> {
        match self.update_with(path, op) {
            Ok(differ) => differ,
            Err(err) => panic!("invalid differ update at `{path}`: {err}"),
        }
    }
}

impl<T, D> Differ<T> for Arc<D>
where
    D: Differ<T> + ?Sized,
{
    fn diff(&self, input: Presence<&T>) -> DiffResult {
        (**self).diff(input)
    }

    fn update_with(&self, path: &UpdatePath, op: &DifferOp) -> UpdateResult<DifferRef<T>> {
        (**self).update_with(path, op)
    }
}

/// Log and return an update failure.
pub(crate) fn rejected<T>(err: UpdateError) -> UpdateResult<T> {
    debug!(error = %err, "differ update rejected");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::LeafDiffer;

    #[test]
    fn shared_handle_delegates() {
        let differ: DifferRef<i32> = Arc::new(LeafDiffer::<i32>::equal());
        assert!(differ.diff_pair(&3, &3).is_ok());
        assert!(!differ.diff_pair(&3, &4).is_ok());
    }

    #[test]
    fn update_unchecked_applies_valid_update() {
        let differ = LeafDiffer::<i32>::equal();
        let ignored = differ.update_unchecked(&UpdatePath::root(), &DifferOp::ignore());
        assert!(ignored.diff_pair(&3, &4).is_ok());
    }

    #[test]
    #[should_panic(expected = "invalid differ update at `x`")]
    fn update_unchecked_panics_on_invalid_path() {
        let differ = LeafDiffer::<i32>::equal();
        let _ = differ.update_unchecked(&UpdatePath::root().field("x"), &DifferOp::ignore());
    }
}
