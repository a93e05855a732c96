use crate::domain::DateCutoff;
use crate::errors::FeatureError;

/// Names of the review log columns the engine reads
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnNames {
    pub user: String,
    pub business: String,
    pub rating: String,
    pub date: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            user: "user_id".to_string(),
            business: "business_id".to_string(),
            rating: "rating".to_string(),
            date: "date".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSettings {
    pub date_cutoff: DateCutoff,
    pub min_community_size: u64,
    pub min_community_visitors: u64,
    pub columns: ColumnNames,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            date_cutoff: DateCutoff::default(),
            min_community_size: 10,
            min_community_visitors: 10,
            columns: ColumnNames::default(),
        }
    }
}

impl FeatureSettings {
    pub fn validate(&self) -> Result<(), FeatureError> {
        let columns = [
            &self.columns.user,
            &self.columns.business,
            &self.columns.rating,
            &self.columns.date,
        ];
        if columns.iter().any(|name| name.trim().is_empty()) {
            return Err(FeatureError::InvalidConfig(
                "column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSettings {
    pub train_size: f64,
    pub validation_size: f64,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            train_size: 0.7,
            validation_size: 0.15,
        }
    }
}

impl SplitSettings {
    pub fn validate(&self) -> Result<(), FeatureError> {
        for (name, value) in [
            ("train_size", self.train_size),
            ("validation_size", self.validation_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FeatureError::InvalidConfig(format!(
                    "{} must be a non-negative fraction, got {}",
                    name, value
                )));
            }
        }

        if self.train_size + self.validation_size >= 1.0 {
            return Err(FeatureError::InvalidConfig(
                "train and validation sizes must add up to less than 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub features: FeatureSettings,
    pub split: SplitSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::new();

        assert_eq!(config.features.min_community_size, 10);
        assert_eq!(config.features.min_community_visitors, 10);
        assert_eq!(config.features.columns.user, "user_id");
        assert_eq!(config.features.columns.business, "business_id");
        assert!(config.split.validate().is_ok());
    }

    #[test]
    fn test_split_fractions_must_sum_below_one() {
        let settings = SplitSettings {
            train_size: 0.8,
            validation_size: 0.2,
        };

        assert!(matches!(
            settings.validate(),
            Err(FeatureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_split_fractions_must_be_non_negative() {
        let settings = SplitSettings {
            train_size: -0.1,
            validation_size: 0.2,
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_column_alias_rejected() {
        let mut settings = FeatureSettings::default();
        settings.columns.business = " ".to_string();

        assert!(settings.validate().is_err());
    }
}
