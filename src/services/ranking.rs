use anyhow::Result;
use log::info;
use std::path::Path;

use crate::dataset;
use crate::ranking;

pub struct TopNService {
    n: usize,
}

impl TopNService {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Returns the number of users with a ranked list
    pub fn run(&self, predictions: &Path, output: &Path) -> Result<usize> {
        let predictions = dataset::load_predictions(predictions)?;
        let top = ranking::top_n(&predictions, self.n);
        info!("  → Ranked top {} businesses for {} users", self.n, top.len());

        dataset::save_top_n(output, &top)?;
        Ok(top.len())
    }
}
