pub mod normalizer;
pub mod pipeline;
pub mod resolver;

pub use normalizer::{normalize, normalize_with, Normalizer};
pub use pipeline::{compute_distances, DistanceOutput, DistancePipeline, DropSummary};
pub use resolver::{resolve, resolve_name, Resolution};
