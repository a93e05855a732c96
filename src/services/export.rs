use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::cache::MatrixSnapshot;
use crate::community::{self, GLOBAL_LABEL};
use crate::config::FeatureSettings;
use crate::dataset::{self, ReviewLog};
use crate::errors::write_context;

#[derive(Debug, Serialize)]
struct MatrixRow<'a> {
    business_id: &'a str,
    community: &'a str,
    mean_rating: f64,
    visit_count: u64,
    visit_share: f64,
}

/// Builds the community matrices and writes them as one long-format CSV
pub struct MatrixExportService {
    settings: FeatureSettings,
}

impl MatrixExportService {
    pub fn new(settings: FeatureSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Returns the number of cells written
    pub fn run(&self, reviews: &Path, partition: &Path, output: &Path) -> Result<usize> {
        let partition = dataset::load_partition(partition)?;
        let review_log = ReviewLog::load(reviews, &self.settings.columns)?;
        let matrices = community::build_matrices(
            review_log.reviews(),
            &partition,
            self.settings.date_cutoff,
        )?;

        let snapshot =
            MatrixSnapshot::from_matrices(&matrices, self.settings.date_cutoff.to_string());
        let file = std::fs::File::create(output)
            .with_context(|| write_context("community matrices", output))?;
        write_snapshot(file, &snapshot)
            .with_context(|| write_context("community matrices", output))?;

        info!("  → Exported {} matrix cells to {}", snapshot.cells.len(), output.display());
        Ok(snapshot.cells.len())
    }
}

/// The global column is labelled `all_dataset`
pub fn write_snapshot<W: Write>(writer: W, snapshot: &MatrixSnapshot) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    for cell in &snapshot.cells {
        writer.serialize(MatrixRow {
            business_id: &cell.business_id,
            community: cell.community.as_deref().unwrap_or(GLOBAL_LABEL),
            mean_rating: cell.mean_rating,
            visit_count: cell.visit_count,
            visit_share: cell.visit_share,
        })?;
    }
    writer.flush()?;
    Ok(())
}
