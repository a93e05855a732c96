use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type BusinessId = String;
pub type CommunityId = String;

/// A single timestamped review of a business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: UserId,
    pub business_id: BusinessId,
    pub rating: f64,
    pub date: NaiveDateTime,
}

impl Review {
    pub fn new(
        user_id: impl Into<UserId>,
        business_id: impl Into<BusinessId>,
        rating: f64,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            business_id: business_id.into(),
            rating,
            date,
        }
    }
}

/// A scored (user, business) pair produced by a recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub business_id: BusinessId,
    pub true_rating: Option<f64>,
    pub estimate: f64,
}
