use log::info;
use rayon::prelude::*;

use super::resolution::{resolve, ReliabilityThresholds, Resolution};
use super::types::CommunityMatrices;
use crate::domain::{CommunityId, CommunityPartition, Review};
use crate::errors::FeatureError;

/// A review together with the statistics of its author's community
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedReview {
    pub review: Review,
    pub community: CommunityId,
    pub resolution: Resolution,
}

impl AnnotatedReview {
    pub fn community_mean_rating(&self) -> Option<f64> {
        self.resolution.mean_rating()
    }

    pub fn community_visit_share(&self) -> Option<f64> {
        self.resolution.visit_share()
    }
}

/// Annotates every review, in input order, with its author's community statistics.
///
/// `partition` must be the one `matrices` were built from. Rows are resolved
/// independently; an unmapped author fails the whole call.
pub fn annotate(
    reviews: &[Review],
    partition: &CommunityPartition,
    matrices: &CommunityMatrices,
    thresholds: &ReliabilityThresholds,
) -> Result<Vec<AnnotatedReview>, FeatureError> {
    info!(
        "Annotating {} reviews (min community size {}, min community visitors {})",
        reviews.len(),
        thresholds.min_community_size,
        thresholds.min_community_visitors
    );

    let annotated = reviews
        .par_iter()
        .map(|review| annotate_review(review, partition, matrices, thresholds))
        .collect::<Result<Vec<_>, _>>()?;

    log_resolution_summary(&annotated);
    Ok(annotated)
}

fn annotate_review(
    review: &Review,
    partition: &CommunityPartition,
    matrices: &CommunityMatrices,
    thresholds: &ReliabilityThresholds,
) -> Result<AnnotatedReview, FeatureError> {
    let community = partition.community_of(&review.user_id)?;
    let resolution = resolve(
        matrices,
        &review.business_id,
        community,
        partition.population(community),
        thresholds,
    );

    Ok(AnnotatedReview {
        review: review.clone(),
        community: community.clone(),
        resolution,
    })
}

fn log_resolution_summary(annotated: &[AnnotatedReview]) {
    let (mut community, mut global, mut no_data) = (0usize, 0usize, 0usize);
    for row in annotated {
        match row.resolution {
            Resolution::Community { .. } => community += 1,
            Resolution::Global { .. } => global += 1,
            Resolution::NoData => no_data += 1,
        }
    }
    info!(
        "  → {} rows use community statistics, {} fall back to global, {} have no data",
        community, global, no_data
    );
}
