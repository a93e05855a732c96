use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::info;

use crate::community::AnnotatedReview;
use crate::config::ColumnNames;
use crate::domain::{parse_timestamp, Review};
use crate::errors::{read_context, with_parse_context, write_context};

pub const COMMUNITY_COLUMN: &str = "community";
pub const MEAN_RATING_COLUMN: &str = "community_mean_rating";
pub const VISIT_SHARE_COLUMN: &str = "community_percentage_of_visits";

struct ColumnIndex {
    user: usize,
    business: usize,
    rating: usize,
    date: usize,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord, columns: &ColumnNames) -> Result<Self> {
        Ok(Self {
            user: find_column(headers, &columns.user)?,
            business: find_column(headers, &columns.business)?,
            rating: find_column(headers, &columns.rating)?,
            date: find_column(headers, &columns.date)?,
        })
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .with_context(|| format!("Required column '{}' not found in review log", name))
}

/// A review log as read from CSV: the typed reviews plus every original
/// field, so rows can be written back unchanged.
#[derive(Debug, Clone)]
pub struct ReviewLog {
    headers: StringRecord,
    records: Vec<StringRecord>,
    reviews: Vec<Review>,
}

impl ReviewLog {
    pub fn load(path: &Path, columns: &ColumnNames) -> Result<Self> {
        let file = File::open(path).with_context(|| read_context("review log", path))?;
        let review_log =
            Self::from_reader(file, columns).with_context(|| read_context("review log", path))?;
        info!("Loaded {} reviews from {}", review_log.len(), path.display());
        Ok(review_log)
    }

    pub fn from_reader<R: Read>(reader: R, columns: &ColumnNames) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let index = ColumnIndex::locate(&headers, columns)?;

        let mut records = Vec::new();
        let mut reviews = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = with_parse_context(record, "review log row")?;
            let review = parse_review(&record, &index)
                .with_context(|| format!("Invalid review on data row {}", row + 1))?;
            reviews.push(review);
            records.push(record);
        }

        Ok(Self {
            headers,
            records,
            reviews,
        })
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// A new log holding the given rows, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            reviews: indices.iter().map(|&i| self.reviews[i].clone()).collect(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| write_context("review log", path))?;
        self.write(file)
            .with_context(|| write_context("review log", path))?;
        info!("Saved {} reviews to {}", self.len(), path.display());
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_annotated(&self, path: &Path, annotated: &[AnnotatedReview]) -> Result<()> {
        let file =
            File::create(path).with_context(|| write_context("annotated review log", path))?;
        self.write_annotated(file, annotated)
            .with_context(|| write_context("annotated review log", path))?;
        info!("Saved {} annotated reviews to {}", annotated.len(), path.display());
        Ok(())
    }

    /// Writes every original row followed by its community, mean rating and
    /// visit share. Missing statistics become empty fields.
    pub fn write_annotated<W: Write>(&self, writer: W, annotated: &[AnnotatedReview]) -> Result<()> {
        anyhow::ensure!(
            annotated.len() == self.records.len(),
            "Annotated row count {} does not match review log row count {}",
            annotated.len(),
            self.records.len()
        );

        let mut writer = WriterBuilder::new().from_writer(writer);

        let mut headers = self.headers.clone();
        headers.push_field(COMMUNITY_COLUMN);
        headers.push_field(MEAN_RATING_COLUMN);
        headers.push_field(VISIT_SHARE_COLUMN);
        writer.write_record(&headers)?;

        for (record, row) in self.records.iter().zip(annotated) {
            let mut record = record.clone();
            record.push_field(&row.community);
            record.push_field(&format_optional(row.community_mean_rating()));
            record.push_field(&format_optional(row.community_visit_share()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn parse_review(record: &StringRecord, index: &ColumnIndex) -> Result<Review> {
    let field = |position: usize| record.get(position).unwrap_or("").trim();

    let rating = field(index.rating);
    let rating: f64 = rating
        .parse()
        .with_context(|| format!("Rating '{}' is not a number", rating))?;
    let date = parse_timestamp(field(index.date))?;

    Ok(Review::new(field(index.user), field(index.business), rating, date))
}

pub(crate) fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::Resolution;

    const LOG: &str = "\
review_id,uid,bid,rating,date,useful
r1,u1,b1,5,2018-01-01,3
r2,u2,b1,3.5,2018-01-02 10:00:00,0
";

    fn columns() -> ColumnNames {
        ColumnNames {
            user: "uid".to_string(),
            business: "bid".to_string(),
            ..ColumnNames::default()
        }
    }

    #[test]
    fn test_reads_reviews_with_column_aliases() {
        let log = ReviewLog::from_reader(LOG.as_bytes(), &columns()).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.reviews()[0].user_id, "u1");
        assert_eq!(log.reviews()[1].business_id, "b1");
        assert_eq!(log.reviews()[1].rating, 3.5);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let err = ReviewLog::from_reader(LOG.as_bytes(), &ColumnNames::default()).unwrap_err();

        assert!(err.to_string().contains("user_id"));
    }

    #[test]
    fn test_bad_rating_is_reported_with_row() {
        let bad = "uid,bid,rating,date\nu1,b1,five,2018-01-01\n";
        let err = ReviewLog::from_reader(bad.as_bytes(), &columns()).unwrap_err();

        assert!(format!("{:#}", err).contains("data row 1"));
    }

    #[test]
    fn test_annotated_output_keeps_original_fields() {
        let log = ReviewLog::from_reader(LOG.as_bytes(), &columns()).unwrap();
        let annotated = vec![
            AnnotatedReview {
                review: log.reviews()[0].clone(),
                community: "A".to_string(),
                resolution: Resolution::Community {
                    mean_rating: 4.25,
                    visit_share: 0.5,
                },
            },
            AnnotatedReview {
                review: log.reviews()[1].clone(),
                community: "B".to_string(),
                resolution: Resolution::NoData,
            },
        ];

        let mut out = Vec::new();
        log.write_annotated(&mut out, &annotated).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "review_id,uid,bid,rating,date,useful,community,community_mean_rating,community_percentage_of_visits"
        );
        assert_eq!(lines[1], "r1,u1,b1,5,2018-01-01,3,A,4.25,0.5");
        assert_eq!(lines[2], "r2,u2,b1,3.5,2018-01-02 10:00:00,0,B,,");
    }

    #[test]
    fn test_annotated_output_requires_matching_rows() {
        let log = ReviewLog::from_reader(LOG.as_bytes(), &columns()).unwrap();

        assert!(log.write_annotated(Vec::new(), &[]).is_err());
    }

    #[test]
    fn test_select_reorders_rows() {
        let log = ReviewLog::from_reader(LOG.as_bytes(), &columns()).unwrap();
        let reversed = log.select(&[1, 0]);

        let mut out = Vec::new();
        reversed.write(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.lines().nth(1).unwrap().starts_with("r2,"));
        assert_eq!(reversed.reviews()[1].user_id, "u1");
    }
}
