//! Foundation types for tdiff, a structural comparison engine for tests.
//!
//! This crate holds the pure data shared by every differ: how the two sides
//! of a comparison are presented, the result tree a comparison produces, and
//! the addressing scheme used to reconfigure a nested differ. It contains no
//! comparison logic; `tdiff-core` builds on it.
//!
//! # Key Types
//!
//! - [`Presence`] / [`MatchType`] -- Which sides of a comparison are present
//! - [`DiffResult`] -- Tagged result tree (value, record, list, set, map)
//! - [`UpdatePath`] / [`UpdateStep`] -- Address of a node inside a differ tree
//! - [`DifferOp`] / [`MatchBy`] / [`KeyFn`] -- Reconfiguration commands
//! - [`UpdateError`] -- Structured failures of the update protocol

pub mod error;
pub mod op;
pub mod path;
pub mod presence;
pub mod result;

pub use error::{UpdateError, UpdateResult};
pub use op::{DifferOp, KeyFn, Keyer, MatchBy, MatchKey, TypeTag};
pub use path::{UpdatePath, UpdateStep};
pub use presence::{MatchType, Presence};
pub use result::{
    DiffResult, ListResult, MapEntry, MapResult, RecordResult, SetResult, ValueResult,
};
