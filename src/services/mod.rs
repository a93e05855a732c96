pub mod export;
pub mod processing;
pub mod ranking;
pub mod split;

pub use export::MatrixExportService;
pub use processing::{FeatureJob, FeatureReport, ProcessingService};
pub use ranking::TopNService;
pub use split::{SplitReport, SplitService};
