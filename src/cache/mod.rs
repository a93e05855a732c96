mod snapshot;
mod structs;

pub use snapshot::{CellRecord, MatrixSnapshot};
pub use structs::MatrixCache;
