use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

use crate::config::{ColumnNames, SplitSettings};
use crate::dataset::{self, ReviewLog};

/// Row counts written for each part of a split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitReport {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

pub struct SplitService {
    settings: SplitSettings,
    columns: ColumnNames,
}

impl SplitService {
    pub fn new(settings: SplitSettings, columns: ColumnNames) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, columns })
    }

    /// Writes `train.csv`, `validation.csv` and `test.csv` into `output_dir`
    pub fn run(&self, reviews: &Path, output_dir: &Path) -> Result<SplitReport> {
        let review_log = ReviewLog::load(reviews, &self.columns)?;
        let split = dataset::split_train_validation_test(review_log.reviews(), &self.settings)?;

        std::fs::create_dir_all(output_dir)?;
        for (name, indices) in [
            ("train", &split.train),
            ("validation", &split.validation),
            ("test", &split.test),
        ] {
            let path: PathBuf = output_dir.join(format!("{}.csv", name));
            review_log.select(indices).save(&path)?;
            info!("  → {} rows in {}", indices.len(), name);
        }

        Ok(SplitReport {
            train: split.train.len(),
            validation: split.validation.len(),
            test: split.test.len(),
        })
    }
}
