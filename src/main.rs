use anyhow::Result;
use colored::Colorize;

use community_features::cli::Command;
use community_features::{
    handle_completions, handle_features, handle_matrices, handle_split, handle_top, interpret,
    FeatureOutputs,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Features {
            dataset,
            thresholds,
            output,
            database,
            cache_dir,
            refresh_cache,
        } => handle_features(
            &dataset,
            &thresholds,
            FeatureOutputs {
                output,
                database,
                cache_dir,
                refresh_cache,
            },
        ),
        Command::Matrices { dataset, output } => handle_matrices(&dataset, &output),
        Command::Split {
            reviews,
            output_dir,
            train_size,
            validation_size,
            columns,
        } => handle_split(&reviews, &output_dir, train_size, validation_size, &columns),
        Command::Top {
            predictions,
            output,
            n,
        } => handle_top(&predictions, &output, n),
        Command::Completions { shell } => handle_completions(shell),
    }
}
