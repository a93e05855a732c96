use std::collections::HashMap;

use log::info;
use rayon::prelude::*;

use super::types::{Column, CommunityMatrices};
use crate::domain::{CommunityPartition, DateCutoff, Review};
use crate::errors::FeatureError;

type CellKey<'a> = (&'a str, &'a str);
type CellTable<'a> = HashMap<CellKey<'a>, CellAccumulator>;

/// Running count and rating sum of one (business, community) group.
/// Partial tables merge by summing both fields, never by averaging means.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CellAccumulator {
    count: u64,
    rating_sum: f64,
}

impl CellAccumulator {
    fn add(&mut self, rating: f64) {
        self.count += 1;
        self.rating_sum += rating;
    }

    fn merge(&mut self, other: &CellAccumulator) {
        self.count += other.count;
        self.rating_sum += other.rating_sum;
    }

    fn mean(&self) -> f64 {
        self.rating_sum / self.count as f64
    }
}

/// Builds the mean rating, visit count and visit share matrices from every
/// review dated on or before `cutoff`.
///
/// Fails with [`FeatureError::UnknownUser`] if an included review was written
/// by a user the partition does not know. Reviews after the cutoff are never
/// looked up.
pub fn build_matrices(
    reviews: &[Review],
    partition: &CommunityPartition,
    cutoff: DateCutoff,
) -> Result<CommunityMatrices, FeatureError> {
    info!(
        "Building community matrices from {} reviews (cutoff {})",
        reviews.len(),
        cutoff
    );

    let cells = aggregate_cells(reviews, partition, cutoff)?;
    info!("  → {} business x community cells observed", cells.len());

    let mut matrices = assemble_community_cells(&cells, partition);
    add_global_column(&mut matrices, partition);

    info!(
        "  → Matrices cover {} businesses and {} communities",
        matrices.business_count(),
        matrices.visit_count.community_columns().len()
    );
    Ok(matrices)
}

fn aggregate_cells<'a>(
    reviews: &'a [Review],
    partition: &'a CommunityPartition,
    cutoff: DateCutoff,
) -> Result<CellTable<'a>, FeatureError> {
    reviews
        .par_iter()
        .filter(|review| cutoff.includes(review.date))
        .try_fold(CellTable::new, |mut table, review| {
            let community = partition.community_of(&review.user_id)?;
            table
                .entry((review.business_id.as_str(), community.as_str()))
                .or_default()
                .add(review.rating);
            Ok::<_, FeatureError>(table)
        })
        .try_reduce(CellTable::new, |mut merged, partial| {
            for (key, cell) in partial {
                merged.entry(key).or_default().merge(&cell);
            }
            Ok(merged)
        })
}

fn assemble_community_cells(
    cells: &CellTable<'_>,
    partition: &CommunityPartition,
) -> CommunityMatrices {
    let mut matrices = CommunityMatrices::default();

    for (&(business, community), cell) in cells {
        let column = Column::community(community);
        // Every observed community holds at least the reviewer, so population > 0.
        let population = partition.population(community) as f64;

        matrices.mean_rating.insert(business, column.clone(), cell.mean());
        matrices.visit_count.insert(business, column.clone(), cell.count);
        matrices
            .visit_share
            .insert(business, column, cell.count as f64 / population);
    }

    matrices
}

fn add_global_column(matrices: &mut CommunityMatrices, partition: &CommunityPartition) {
    let total_population = partition.total_population() as f64;
    let mut globals = Vec::with_capacity(matrices.business_count());

    for business in matrices.visit_count.businesses() {
        let Some(counts) = matrices.visit_count.row(business) else {
            continue;
        };

        let mut total_count = 0u64;
        let mut weighted_rating = 0.0;
        for (community, count) in counts.communities() {
            total_count += count;
            // Only communities with a mean cell contribute; absent cells are skipped.
            if let Some(mean) = matrices.mean_rating.community(business, community) {
                weighted_rating += count as f64 * mean;
            }
        }

        globals.push((business.clone(), total_count, weighted_rating));
    }

    for (business, total_count, weighted_rating) in globals {
        matrices
            .mean_rating
            .insert(business.clone(), Column::Global, weighted_rating / total_count as f64);
        matrices
            .visit_share
            .insert(business.clone(), Column::Global, total_count as f64 / total_population);
        matrices.visit_count.insert(business, Column::Global, total_count);
    }
}
