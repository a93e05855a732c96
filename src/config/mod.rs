pub mod settings;

pub use settings::{AppConfig, ColumnNames, FeatureSettings, SplitSettings};
