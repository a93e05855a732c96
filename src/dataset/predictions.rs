use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use log::info;
use serde::Serialize;

use crate::domain::Prediction;
use crate::errors::{read_context, with_parse_context, write_context};
use crate::ranking::TopN;

pub fn load_predictions(path: &Path) -> Result<Vec<Prediction>> {
    let file = File::open(path).with_context(|| read_context("predictions", path))?;
    let predictions = read_predictions(file).with_context(|| read_context("predictions", path))?;
    info!("Loaded {} predictions from {}", predictions.len(), path.display());
    Ok(predictions)
}

/// Reads `user_id,business_id,true_rating,estimate` rows; `true_rating` may be empty
pub fn read_predictions<R: Read>(reader: R) -> Result<Vec<Prediction>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    reader
        .deserialize::<Prediction>()
        .map(|row| with_parse_context(row, "prediction row"))
        .collect()
}

#[derive(Debug, Serialize)]
struct RankedRow<'a> {
    user_id: &'a str,
    rank: usize,
    business_id: &'a str,
    estimate: f64,
}

pub fn save_top_n(path: &Path, top: &TopN) -> Result<()> {
    let file = File::create(path).with_context(|| write_context("top-n list", path))?;
    write_top_n(file, top).with_context(|| write_context("top-n list", path))?;
    info!("Saved top-n lists for {} users to {}", top.len(), path.display());
    Ok(())
}

pub fn write_top_n<W: Write>(writer: W, top: &TopN) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    for (user_id, list) in top {
        for (position, (business_id, estimate)) in list.iter().enumerate() {
            writer.serialize(RankedRow {
                user_id,
                rank: position + 1,
                business_id,
                estimate: *estimate,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
