pub mod partition;
pub mod predictions;
pub mod reviews;
pub mod split;

pub use partition::{load_partition, parse_partition};
pub use predictions::{load_predictions, save_top_n};
pub use reviews::ReviewLog;
pub use split::{split_train_validation_test, ChronologicalSplit};
