use anyhow::Result;
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::cache::{MatrixCache, MatrixSnapshot};
use crate::community::{self, AnnotatedReview, CommunityMatrices, ReliabilityThresholds};
use crate::config::FeatureSettings;
use crate::database::{self, DbConn};
use crate::dataset::{self, ReviewLog};
use crate::domain::CommunityPartition;

/// Input and output locations of one feature computation
#[derive(Debug, Clone)]
pub struct FeatureJob {
    pub reviews: PathBuf,
    pub partition: PathBuf,
    pub output: PathBuf,
    pub database: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub refresh_cache: bool,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureReport {
    pub rows: usize,
    pub businesses: usize,
    pub matrices_from_cache: bool,
}

pub struct ProcessingService {
    settings: FeatureSettings,
    job: FeatureJob,
}

impl ProcessingService {
    pub fn new(settings: FeatureSettings, job: FeatureJob) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, job })
    }

    pub fn run(&self) -> Result<FeatureReport> {
        info!("=== Computing Community Features ===\n");

        // Step 1: Load inputs
        let partition = dataset::load_partition(&self.job.partition)?;
        let review_log = ReviewLog::load(&self.job.reviews, &self.settings.columns)?;
        info!("  → Loaded {} reviews and {} users\n", review_log.len(), partition.len());

        // Step 2: Build (or reuse) the community matrices
        let (matrices, from_cache) = self.load_or_build_matrices(&review_log, &partition)?;

        // Step 3: Annotate every review
        let thresholds = ReliabilityThresholds::from(&self.settings);
        let annotated =
            community::annotate(review_log.reviews(), &partition, &matrices, &thresholds)?;

        // Step 4: Persist
        review_log.save_annotated(&self.job.output, &annotated)?;
        if let Some(db_path) = &self.job.database {
            self.save_to_database(db_path, &annotated, &matrices)?;
        }

        info!("=== Feature Computation Complete ===");
        Ok(FeatureReport {
            rows: annotated.len(),
            businesses: matrices.business_count(),
            matrices_from_cache: from_cache,
        })
    }

    fn load_or_build_matrices(
        &self,
        review_log: &ReviewLog,
        partition: &CommunityPartition,
    ) -> Result<(CommunityMatrices, bool)> {
        let cutoff = self.settings.date_cutoff;
        let Some(cache_dir) = &self.job.cache_dir else {
            let matrices = community::build_matrices(review_log.reviews(), partition, cutoff)?;
            return Ok((matrices, false));
        };

        let cache = MatrixCache::new(cache_dir)?;
        let key = MatrixCache::key_for(
            &self.job.reviews,
            &self.job.partition,
            &self.settings.columns,
            &cutoff,
        )?;

        if !self.job.refresh_cache {
            match cache.load_matrices(&key) {
                Ok(Some(matrices)) => {
                    info!("  → Reusing cached matrices ({})", key);
                    return Ok((matrices, true));
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable matrix cache entry {}: {:#}", key, e),
            }
        }

        let matrices = community::build_matrices(review_log.reviews(), partition, cutoff)?;
        cache.save_matrices(&key, &matrices, &cutoff)?;
        Ok((matrices, false))
    }

    /// Writes into a temporary database first and swaps it in once complete
    fn save_to_database(
        &self,
        db_path: &Path,
        annotated: &[AnnotatedReview],
        matrices: &CommunityMatrices,
    ) -> Result<()> {
        let temp_db_path = db_path.with_extension("tmp");
        info!("Target DB: {}, Temp DB: {}", db_path.display(), temp_db_path.display());

        if temp_db_path.exists() {
            std::fs::remove_file(&temp_db_path)?;
        }

        {
            let pool = database::create_pool(&temp_db_path)?;
            let mut conn = database::get_connection(&pool)?;
            self.write_tables(&mut conn, annotated, matrices)?;
        }

        std::fs::rename(&temp_db_path, db_path)?;
        info!("Successfully swapped database to {}", db_path.display());
        Ok(())
    }

    fn write_tables(
        &self,
        conn: &mut DbConn,
        annotated: &[AnnotatedReview],
        matrices: &CommunityMatrices,
    ) -> Result<()> {
        database::setup::reset_database(conn)?;

        let snapshot =
            MatrixSnapshot::from_matrices(matrices, self.settings.date_cutoff.to_string());
        let cells = database::matrices::insert_snapshot(conn, &snapshot)?;
        info!("  → Saved {} matrix cells", cells);

        let rows = database::features::insert_annotated_reviews(conn, annotated)?;
        info!("  → Saved {} review feature rows", rows);
        Ok(())
    }
}
