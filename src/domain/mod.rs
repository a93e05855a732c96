pub mod dates;
pub mod models;
mod partition;

pub use dates::{parse_timestamp, DateCutoff};
pub use models::*;
pub use partition::CommunityPartition;
