use std::fmt;

use serde::{Deserialize, Serialize};

/// Which sides of a comparison carry a value.
///
/// Every differ receives its input as a `Presence` rather than a plain pair,
/// so elements or map keys that exist on only one side are reported with the
/// same comparators used for full comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Presence<T> {
    /// Both the actual and the expected value are present.
    Both(T, T),
    /// Only the actual value is present.
    ActualOnly(T),
    /// Only the expected value is present.
    ExpectedOnly(T),
}

impl<T> Presence<T> {
    /// Build a presence from two optional sides. Returns `None` when both are absent.
    pub fn from_options(actual: Option<T>, expected: Option<T>) -> Option<Self> {
        match (actual, expected) {
            (Some(a), Some(e)) => Some(Self::Both(a, e)),
            (Some(a), None) => Some(Self::ActualOnly(a)),
            (None, Some(e)) => Some(Self::ExpectedOnly(e)),
            (None, None) => None,
        }
    }

    /// The tag describing which sides are present.
    pub fn match_type(&self) -> MatchType {
        match self {
            Self::Both(..) => MatchType::Both,
            Self::ActualOnly(_) => MatchType::ActualOnly,
            Self::ExpectedOnly(_) => MatchType::ExpectedOnly,
        }
    }

    /// Borrow both sides.
    pub fn as_ref(&self) -> Presence<&T> {
        match self {
            Self::Both(a, e) => Presence::Both(a, e),
            Self::ActualOnly(a) => Presence::ActualOnly(a),
            Self::ExpectedOnly(e) => Presence::ExpectedOnly(e),
        }
    }

    /// Apply `f` to every present side, keeping the presence shape.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Presence<U> {
        match self {
            Self::Both(a, e) => Presence::Both(f(a), f(e)),
            Self::ActualOnly(a) => Presence::ActualOnly(f(a)),
            Self::ExpectedOnly(e) => Presence::ExpectedOnly(f(e)),
        }
    }

    /// The actual side, if present.
    pub fn actual(&self) -> Option<&T> {
        match self {
            Self::Both(a, _) | Self::ActualOnly(a) => Some(a),
            Self::ExpectedOnly(_) => None,
        }
    }

    /// The expected side, if present.
    pub fn expected(&self) -> Option<&T> {
        match self {
            Self::Both(_, e) | Self::ExpectedOnly(e) => Some(e),
            Self::ActualOnly(_) => None,
        }
    }
}

/// The presence tag recorded on every result node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Both,
    ActualOnly,
    ExpectedOnly,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Both => "both",
            MatchType::ActualOnly => "actual_only",
            MatchType::ExpectedOnly => "expected_only",
        }
    }

    /// Returns `true` if only one side was present.
    pub fn is_one_sided(&self) -> bool {
        !matches!(self, MatchType::Both)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
