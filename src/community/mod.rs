pub mod annotator;
pub mod builder;
pub mod resolution;
pub mod types;

pub use annotator::{annotate, AnnotatedReview};
pub use builder::build_matrices;
pub use resolution::{resolve, ReliabilityThresholds, Resolution};
pub use types::{Column, CommunityMatrices, MatrixRow, SparseMatrix, GLOBAL_LABEL};
