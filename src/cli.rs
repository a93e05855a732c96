use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::{ColumnNames, FeatureSettings, SplitSettings};
use crate::domain::DateCutoff;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Community-conditioned review features for recommendation models"
)]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

/// Column aliases of the review log
#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct ColumnArgs {
    /// Name of the user id column (defaults to user_id)
    #[arg(long)]
    pub user_column: Option<String>,

    /// Name of the business id column (defaults to business_id)
    #[arg(long)]
    pub business_column: Option<String>,
}

impl ColumnArgs {
    pub fn apply(&self, columns: &mut ColumnNames) {
        if let Some(user) = &self.user_column {
            columns.user = user.clone();
        }
        if let Some(business) = &self.business_column {
            columns.business = business.clone();
        }
    }
}

/// Inputs shared by every command that builds matrices
#[derive(Args, Debug, Clone, PartialEq)]
pub struct DatasetArgs {
    /// Review log CSV
    #[arg(long)]
    pub reviews: PathBuf,

    /// JSON object mapping every user id to a community label
    #[arg(long)]
    pub partition: PathBuf,

    /// Only reviews on or before this date build the matrices (defaults to 2018-10-10)
    #[arg(long)]
    pub date_cutoff: Option<DateCutoff>,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

impl DatasetArgs {
    pub fn apply(&self, settings: &mut FeatureSettings) {
        if let Some(cutoff) = self.date_cutoff {
            settings.date_cutoff = cutoff;
        }
        self.columns.apply(&mut settings.columns);
    }
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct ThresholdArgs {
    /// Smaller communities always use dataset-wide statistics (defaults to 10)
    #[arg(long)]
    pub min_community_size: Option<u64>,

    /// Business cells with fewer visits use dataset-wide statistics (defaults to 10)
    #[arg(long)]
    pub min_community_visitors: Option<u64>,
}

impl ThresholdArgs {
    pub fn apply(&self, settings: &mut FeatureSettings) {
        if let Some(size) = self.min_community_size {
            settings.min_community_size = size;
        }
        if let Some(visitors) = self.min_community_visitors {
            settings.min_community_visitors = visitors;
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Annotate every review with its author's community statistics
    Features {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Annotated review log CSV to write
        #[arg(short, long)]
        output: PathBuf,

        /// Also store features and matrices in this SQLite database
        #[arg(long)]
        database: Option<PathBuf>,

        /// Reuse matrices built by earlier runs from this directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Rebuild matrices even if a cached copy exists
        #[arg(long)]
        refresh_cache: bool,
    },
    /// Export the business x community matrices as CSV
    Matrices {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Matrix CSV to write
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Split a review log chronologically into train, validation and test files
    Split {
        /// Review log CSV
        #[arg(long)]
        reviews: PathBuf,

        /// Directory receiving train.csv, validation.csv and test.csv
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Fraction of the oldest reviews used for training (defaults to 0.7)
        #[arg(long)]
        train_size: Option<f64>,

        /// Fraction of reviews used for validation (defaults to 0.15)
        #[arg(long)]
        validation_size: Option<f64>,

        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Keep the best-scored businesses per user from a predictions CSV
    Top {
        /// CSV with user_id, business_id, true_rating and estimate columns
        #[arg(long)]
        predictions: PathBuf,

        /// Ranked CSV to write
        #[arg(short, long)]
        output: PathBuf,

        /// Number of businesses kept per user
        #[arg(short, default_value_t = 10)]
        n: usize,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn apply_split_args(
    settings: &mut SplitSettings,
    train_size: Option<f64>,
    validation_size: Option<f64>,
) {
    if let Some(train_size) = train_size {
        settings.train_size = train_size;
    }
    if let Some(validation_size) = validation_size {
        settings.validation_size = validation_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_features_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "community_features",
            "features",
            "--reviews",
            "reviews.csv",
            "--partition",
            "partition.json",
            "--date-cutoff",
            "2018-12-31",
            "--min-community-size",
            "2",
            "--business-column",
            "bid",
            "-o",
            "out.csv",
        ])
        .unwrap();

        let Command::Features {
            dataset, thresholds, ..
        } = cli.command
        else {
            panic!("expected features command");
        };

        let mut settings = FeatureSettings::default();
        dataset.apply(&mut settings);
        thresholds.apply(&mut settings);

        assert_eq!(settings.date_cutoff, "2018-12-31".parse::<DateCutoff>().unwrap());
        assert_eq!(settings.min_community_size, 2);
        assert_eq!(settings.min_community_visitors, 10);
        assert_eq!(settings.columns.business, "bid");
        assert_eq!(settings.columns.user, "user_id");
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let result = Cli::try_parse_from([
            "community_features",
            "features",
            "--reviews",
            "r.csv",
            "--partition",
            "p.json",
            "--min-community-visitors",
            "-1",
            "-o",
            "out.csv",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_cutoff_is_rejected() {
        let result = Cli::try_parse_from([
            "community_features",
            "matrices",
            "--reviews",
            "r.csv",
            "--partition",
            "p.json",
            "--date-cutoff",
            "someday",
            "-o",
            "m.csv",
        ]);

        assert!(result.is_err());
    }
}
