pub mod cache;
pub mod cli;
pub mod community;
pub mod config;
pub mod database;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;

use crate::cli::{Command, DatasetArgs, ThresholdArgs};
use crate::config::settings::AppConfig;
use crate::services::{
    FeatureJob, MatrixExportService, ProcessingService, SplitService, TopNService,
};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub struct FeatureOutputs {
    pub output: std::path::PathBuf,
    pub database: Option<std::path::PathBuf>,
    pub cache_dir: Option<std::path::PathBuf>,
    pub refresh_cache: bool,
}

pub fn handle_features(
    dataset: &DatasetArgs,
    thresholds: &ThresholdArgs,
    outputs: FeatureOutputs,
) -> Result<()> {
    let mut config = AppConfig::new();
    dataset.apply(&mut config.features);
    thresholds.apply(&mut config.features);

    let job = FeatureJob {
        reviews: dataset.reviews.clone(),
        partition: dataset.partition.clone(),
        output: outputs.output,
        database: outputs.database,
        cache_dir: outputs.cache_dir,
        refresh_cache: outputs.refresh_cache,
    };
    let report = ProcessingService::new(config.features, job)?.run()?;
    info!(
        "Annotated {} reviews across {} businesses{}",
        report.rows,
        report.businesses,
        if report.matrices_from_cache { " (cached matrices)" } else { "" }
    );
    Ok(())
}

pub fn handle_matrices(dataset: &DatasetArgs, output: &std::path::Path) -> Result<()> {
    let mut config = AppConfig::new();
    dataset.apply(&mut config.features);

    let service = MatrixExportService::new(config.features)?;
    service.run(&dataset.reviews, &dataset.partition, output)?;
    Ok(())
}

pub fn handle_split(
    reviews: &std::path::Path,
    output_dir: &std::path::Path,
    train_size: Option<f64>,
    validation_size: Option<f64>,
    columns: &cli::ColumnArgs,
) -> Result<()> {
    let mut config = AppConfig::new();
    cli::apply_split_args(&mut config.split, train_size, validation_size);
    columns.apply(&mut config.features.columns);

    let service = SplitService::new(config.split, config.features.columns)?;
    let report = service.run(reviews, output_dir)?;
    info!(
        "Split into {} train, {} validation and {} test reviews",
        report.train, report.validation, report.test
    );
    Ok(())
}

pub fn handle_top(predictions: &std::path::Path, output: &std::path::Path, n: usize) -> Result<()> {
    TopNService::new(n).run(predictions, output)?;
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
