//! Join-and-aggregate query engine.
//!
//! Every report is a pure function from a [`Dataset`](crate::dataset::Dataset)
//! to an ordered list of [`ResultRow`](types::ResultRow)s. Grouping and
//! joining go through the two primitives in [`primitives`]; continuous
//! weather and clock values are bucketed by the classifiers in [`bands`].

pub mod bands;
pub mod keys;
pub mod primitives;
pub mod reports;
pub mod runner;
pub mod types;
pub mod utility;
