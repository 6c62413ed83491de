//! Run-level services built on top of the pipeline output.

pub mod report;

pub use report::{column_stats, DistributionStats, InputChecksums, RunReport, RunSettings};
