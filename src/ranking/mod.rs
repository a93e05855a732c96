pub mod top_n;

pub use top_n::{top_n, RankedList, TopN};
