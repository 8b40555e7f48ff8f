// Match reconciliation: rebuilds per-job match results from raw vector-search chunks.
// Everything except `handlers` is pure and synchronous.

pub mod comparator;
pub mod engine;
pub mod fields;
pub mod grouping;
pub mod handlers;
pub mod scoring;
pub mod skills;
