use std::collections::BTreeMap;

use crate::domain::{BusinessId, Prediction, UserId};

pub type RankedList = Vec<(BusinessId, f64)>;
pub type TopN = BTreeMap<UserId, RankedList>;

/// Keeps, for every user, the `n` businesses with the highest estimate.
/// Equal estimates keep their input order.
pub fn top_n(predictions: &[Prediction], n: usize) -> TopN {
    let mut ranked = TopN::new();
    for prediction in predictions {
        ranked
            .entry(prediction.user_id.clone())
            .or_default()
            .push((prediction.business_id.clone(), prediction.estimate));
    }

    for list in ranked.values_mut() {
        list.sort_by(|a, b| b.1.total_cmp(&a.1));
        list.truncate(n);
    }
    ranked
}
