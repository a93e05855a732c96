use super::types::CommunityMatrices;
use crate::config::FeatureSettings;

/// Minimum evidence required before a community's own statistics are used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliabilityThresholds {
    pub min_community_size: u64,
    pub min_community_visitors: u64,
}

impl Default for ReliabilityThresholds {
    fn default() -> Self {
        Self::from(&FeatureSettings::default())
    }
}

impl From<&FeatureSettings> for ReliabilityThresholds {
    fn from(settings: &FeatureSettings) -> Self {
        Self {
            min_community_size: settings.min_community_size,
            min_community_visitors: settings.min_community_visitors,
        }
    }
}

impl ReliabilityThresholds {
    /// An absent cell is never trusted, whatever the visitor threshold
    pub fn trusts(&self, population: u64, visit_count: Option<u64>) -> bool {
        population >= self.min_community_size
            && visit_count.is_some_and(|count| count >= self.min_community_visitors)
    }
}

/// Outcome of resolving one review's community statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The business was not reviewed before the cutoff
    NoData,
    /// The reviewer's community cell is trusted
    Community { mean_rating: f64, visit_share: f64 },
    /// Fallback to the dataset-wide column
    Global { mean_rating: f64, visit_share: f64 },
}

impl Resolution {
    pub fn mean_rating(&self) -> Option<f64> {
        match *self {
            Resolution::NoData => None,
            Resolution::Community { mean_rating, .. } | Resolution::Global { mean_rating, .. } => {
                Some(mean_rating)
            }
        }
    }

    pub fn visit_share(&self) -> Option<f64> {
        match *self {
            Resolution::NoData => None,
            Resolution::Community { visit_share, .. } | Resolution::Global { visit_share, .. } => {
                Some(visit_share)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Resolution::NoData => "no_data",
            Resolution::Community { .. } => "community",
            Resolution::Global { .. } => "global",
        }
    }
}

/// Picks community, global or no statistics for a (business, community) pair.
///
/// `population` is the size of `community` in the partition the matrices were built from.
pub fn resolve(
    matrices: &CommunityMatrices,
    business: &str,
    community: &str,
    population: u64,
    thresholds: &ReliabilityThresholds,
) -> Resolution {
    if !matrices.has_business(business) {
        return Resolution::NoData;
    }

    let visit_count = matrices.visit_count.community(business, community);
    if thresholds.trusts(population, visit_count) {
        let mean_rating = matrices.mean_rating.community(business, community);
        let visit_share = matrices.visit_share.community(business, community);
        if let (Some(mean_rating), Some(visit_share)) = (mean_rating, visit_share) {
            return Resolution::Community {
                mean_rating,
                visit_share,
            };
        }
    }

    match (
        matrices.mean_rating.global(business),
        matrices.visit_share.global(business),
    ) {
        (Some(mean_rating), Some(visit_share)) => Resolution::Global {
            mean_rating,
            visit_share,
        },
        _ => Resolution::NoData,
    }
}
