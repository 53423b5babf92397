//! Composable structural differs.
//!
//! A differ compares two values of one type and returns a [`DiffResult`]
//! tree explaining where they differ. Differs compose: leaves handle scalars,
//! and records, sequences, sets and maps nest child differs to any depth.
//! An existing differ tree can be reconfigured through [`Differ::update_with`],
//! which walks an [`UpdatePath`] and returns a new tree sharing every
//! untouched subtree with the old one.
//!
//! # Key Types
//!
//! - [`Differ`] / [`DifferRef`] -- The comparator capability and its shared handle
//! - [`LeafDiffer`] -- Equality and numeric-equivalence scalar differs
//! - [`RecordDiffer`] / [`RecordDifferBuilder`] -- Fixed named fields
//! - [`SeqDiffer`] -- Ordered collections, matched by index or by key
//! - [`SetDiffer`] -- Unordered collections, matched by key
//! - [`MapDiffer`] -- Keyed collections
//! - [`Contramap`] -- Compare one type through a projection into another

pub mod collection;
pub mod contramap;
pub mod differ;
pub mod leaf;
pub mod map;
pub mod matching;
pub mod record;
pub mod repr;
pub mod seq;
pub mod set;

#[cfg(test)]
mod properties;

pub use collection::{MapLike, SeqLike, SetLike};
pub use contramap::Contramap;
pub use differ::{Differ, DifferRef};
pub use leaf::LeafDiffer;
pub use map::MapDiffer;
pub use record::{RecordDiffer, RecordDifferBuilder};
pub use repr::{json_repr, NumericEquiv};
pub use seq::SeqDiffer;
pub use set::SetDiffer;

pub use tdiff_types::{
    DiffResult, DifferOp, KeyFn, ListResult, MapEntry, MapResult, MatchBy, MatchType, Presence,
    RecordResult, SetResult, UpdateError, UpdatePath, UpdateResult, UpdateStep, ValueResult,
};
