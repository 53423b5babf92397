//! Addresses into a differ tree.

use std::fmt;
use std::sync::Arc;

/// A single step of an [`UpdatePath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UpdateStep {
    /// Select a named field of a record differ.
    RecordField(String),
    /// Select the 0-based type parameter slot of a parameterized differ
    /// (the item differ of a sequence or set, the value differ of a map).
    DownTypeParam(usize),
    /// Select a named variant of a sum-type differ.
    DownSubtype(String),
}

impl fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordField(name) => f.write_str(name),
            Self::DownTypeParam(idx) => write!(f, "#{idx}"),
            Self::DownSubtype(name) => write!(f, "@{name}"),
        }
    }
}

/// An immutable sequence of steps, consumed one at a time from the front.
///
/// Paths share their step buffer: taking the tail with [`UpdatePath::next`]
/// never copies steps. An empty path addresses the node it is applied to.
#[derive(Clone)]
pub struct UpdatePath {
    steps: Arc<[UpdateStep]>,
    pos: usize,
}

impl UpdatePath {
    /// The empty path.
    pub fn root() -> Self {
        Self::from(Vec::new())
    }

    /// Split into the head step and the remaining tail.
    ///
    /// Returns `None` for an empty path.
    pub fn next(&self) -> Option<(&UpdateStep, UpdatePath)> {
        let head = self.steps.get(self.pos)?;
        let tail = Self {
            steps: Arc::clone(&self.steps),
            pos: self.pos + 1,
        };
        Some((head, tail))
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> &[UpdateStep] {
        &self.steps[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }

    pub fn len(&self) -> usize {
        self.remaining().len()
    }

    /// Append a step, returning a new path.
    pub fn push(&self, step: UpdateStep) -> Self {
        let mut steps = self.remaining().to_vec();
        steps.push(step);
        Self::from(steps)
    }

    /// Append a [`UpdateStep::RecordField`] step.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.push(UpdateStep::RecordField(name.into()))
    }

    /// Append a [`UpdateStep::DownTypeParam`] step.
    pub fn type_param(&self, index: usize) -> Self {
        self.push(UpdateStep::DownTypeParam(index))
    }

    /// Step into the element differ of a sequence or set (type parameter 0).
    pub fn each(&self) -> Self {
        self.type_param(0)
    }

    /// Step into the value differ of a map (type parameter 1).
    pub fn values(&self) -> Self {
        self.type_param(1)
    }

    /// Append a [`UpdateStep::DownSubtype`] step.
    pub fn subtype(&self, name: impl Into<String>) -> Self {
        self.push(UpdateStep::DownSubtype(name.into()))
    }
}

impl Default for UpdatePath {
    fn default() -> Self {
        Self::root()
    }
}

impl From<Vec<UpdateStep>> for UpdatePath {
    fn from(steps: Vec<UpdateStep>) -> Self {
        Self {
            steps: steps.into(),
            pos: 0,
        }
    }
}

impl FromIterator<UpdateStep> for UpdatePath {
    fn from_iter<I: IntoIterator<Item = UpdateStep>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl PartialEq for UpdatePath {
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining()
    }
}

impl Eq for UpdatePath {}

impl fmt::Debug for UpdatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.remaining()).finish()
    }
}

impl fmt::Display for UpdatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<root>");
        }
        for (i, step) in self.remaining().iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
