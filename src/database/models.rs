use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct DbReviewFeature {
    pub id: i64,
    pub row_index: i64,
    pub user_id: String,
    pub business_id: String,
    pub rating: f64,
    pub date: NaiveDateTime,
    pub community: String,
    pub community_mean_rating: Option<f64>,
    pub community_visit_share: Option<f64>,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbMatrixCell {
    pub id: i64,
    pub business_id: String,
    /// `None` for the dataset-wide column
    pub community: Option<String>,
    pub mean_rating: f64,
    pub visit_count: i64,
    pub visit_share: f64,
    pub date_cutoff: String,
}
