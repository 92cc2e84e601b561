//! Reassembles nested entity graphs from flat join-query rows.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod bench_utils;
pub mod children;
pub mod config;
pub mod engine;
pub mod errors;
pub mod index;
pub mod mapper;
pub mod markers;
pub mod model;
pub mod query;
pub mod relation;
pub mod snapshot;
#[cfg(feature = "sqlite-backend")]
pub mod sql;
mod trace;

pub use crate::children::{ChildList, ChildSlot};
pub use crate::config::{ChildOrder, DedupScope, GroupingConfig};
pub use crate::engine::{GroupingEngine, GroupingStats};
pub use crate::errors::GroupingError;
pub use crate::index::AssociationIndex;
pub use crate::mapper::RowMapper;
pub use crate::model::{DataModel, EntityKind, EntityRef, entity};
pub use crate::query::ResultProcessor;
pub use crate::relation::{GroupSpec, Relation, SpecRef};
pub use crate::snapshot::RowSnapshot;
#[cfg(feature = "sqlite-backend")]
pub use crate::sql::{SqlQuery, SqlRow, SqlSelector};
