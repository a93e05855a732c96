use std::collections::HashMap;

use super::models::{CommunityId, UserId};
use crate::errors::FeatureError;

/// User to community assignment together with the population of every community
#[derive(Debug, Clone, Default)]
pub struct CommunityPartition {
    assignments: HashMap<UserId, CommunityId>,
    populations: HashMap<CommunityId, u64>,
}

impl CommunityPartition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, user_id: impl Into<UserId>, community: impl Into<CommunityId>) {
        let community = community.into();
        if let Some(previous) = self.assignments.insert(user_id.into(), community.clone()) {
            self.decrement(&previous);
        }
        *self.populations.entry(community).or_insert(0) += 1;
    }

    /// Community of a user; an unmapped user is a lookup failure
    pub fn community_of(&self, user_id: &str) -> Result<&CommunityId, FeatureError> {
        self.assignments
            .get(user_id)
            .ok_or_else(|| FeatureError::UnknownUser {
                user_id: user_id.to_string(),
            })
    }

    /// Number of users assigned to a community, zero for unknown labels
    pub fn population(&self, community: &str) -> u64 {
        self.populations.get(community).copied().unwrap_or(0)
    }

    pub fn total_population(&self) -> u64 {
        self.populations.values().sum()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn community_count(&self) -> usize {
        self.populations.len()
    }

    fn decrement(&mut self, community: &str) {
        if let Some(count) = self.populations.get_mut(community) {
            *count -= 1;
            if *count == 0 {
                self.populations.remove(community);
            }
        }
    }
}

impl<U, C> FromIterator<(U, C)> for CommunityPartition
where
    U: Into<UserId>,
    C: Into<CommunityId>,
{
    fn from_iter<I: IntoIterator<Item = (U, C)>>(iter: I) -> Self {
        let mut partition = Self::new();
        for (user_id, community) in iter {
            partition.assign(user_id, community);
        }
        partition
    }
}
