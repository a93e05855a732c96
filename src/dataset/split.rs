use crate::config::SplitSettings;
use crate::domain::Review;
use crate::errors::FeatureError;

/// Row indices of a chronological train / validation / test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChronologicalSplit {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
    pub test: Vec<usize>,
}

/// Orders reviews by date (ties keep input order) and cuts the sequence into
/// a train prefix, a validation block and a test suffix.
pub fn split_train_validation_test(
    reviews: &[Review],
    settings: &SplitSettings,
) -> Result<ChronologicalSplit, FeatureError> {
    settings.validate()?;

    let mut order: Vec<usize> = (0..reviews.len()).collect();
    order.sort_by_key(|&i| reviews[i].date);

    let total = reviews.len() as f64;
    let train_end = (total * settings.train_size) as usize;
    // A zero validation size still holds out the single row after the train prefix.
    let validation_end = if settings.validation_size == 0.0 {
        train_end + 1
    } else {
        (total * (settings.train_size + settings.validation_size)) as usize
    }
    .clamp(train_end, reviews.len());

    let test = order.split_off(validation_end);
    let validation = order.split_off(train_end);

    Ok(ChronologicalSplit {
        train: order,
        validation,
        test,
    })
}
