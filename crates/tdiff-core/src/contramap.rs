//! Compare one type through a projection into another.

use std::sync::Arc;

use tdiff_types::{DiffResult, DifferOp, Presence, UpdatePath, UpdateResult};

use crate::differ::{Differ, DifferRef};

/// Adapts a `Differ<B>` into a `Differ<A>` by projecting each side with `f`.
///
/// The adapter has no slot of its own: updates are applied to the inner
/// differ with the same path.
pub struct Contramap<A, B> {
    inner: DifferRef<B>,
    f: Arc<dyn Fn(&A) -> B + Send + Sync>,
}

impl<A, B> Clone for Contramap<A, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            f: Arc::clone(&self.f),
        }
    }
}

impl<A: 'static, B: 'static> Contramap<A, B> {
    pub fn new(
        inner: impl Differ<B> + 'static,
        f: impl Fn(&A) -> B + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(inner),
            f: Arc::new(f),
        }
    }
}

impl<A: 'static, B: 'static> Differ<A> for Contramap<A, B> {
    fn diff(&self, input: Presence<&A>) -> DiffResult {
        let projected = input.map(|v| (self.f)(v));
        self.inner.diff(projected.as_ref())
    }

    fn update_with(&self, path: &UpdatePath, op: &DifferOp) -> UpdateResult<DifferRef<A>> {
        let inner = self.inner.update_with(path, op)?;
        Ok(Arc::new(Self {
            inner,
            f: Arc::clone(&self.f),
        }))
    }
}
