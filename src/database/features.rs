use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::DbReviewFeature;
use crate::community::AnnotatedReview;

const SELECT_COLUMNS: &str = "id, row_index, user_id, business_id, rating, date, community, community_mean_rating, community_percentage_of_visits, resolution";

/// Inserts all annotated rows in one transaction, keeping their input position
pub fn insert_annotated_reviews(conn: &mut DbConn, rows: &[AnnotatedReview]) -> Result<usize> {
    let tx = conn.transaction().context("Failed to start transaction")?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO review_features (row_index, user_id, business_id, rating, date, community, community_mean_rating, community_percentage_of_visits, resolution) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        for (row_index, row) in rows.iter().enumerate() {
            stmt.execute(params![
                row_index as i64,
                row.review.user_id,
                row.review.business_id,
                row.review.rating,
                row.review.date,
                row.community,
                row.community_mean_rating(),
                row.community_visit_share(),
                row.resolution.as_str(),
            ])
            .with_context(|| format!("Failed to insert review feature row {}", row_index))?;
        }
    }
    tx.commit().context("Failed to commit review features")?;
    Ok(rows.len())
}

fn parse_review_feature_row(row: &rusqlite::Row) -> rusqlite::Result<DbReviewFeature> {
    Ok(DbReviewFeature {
        id: row.get(0)?,
        row_index: row.get(1)?,
        user_id: row.get(2)?,
        business_id: row.get(3)?,
        rating: row.get(4)?,
        date: row.get(5)?,
        community: row.get(6)?,
        community_mean_rating: row.get(7)?,
        community_visit_share: row.get(8)?,
        resolution: row.get(9)?,
    })
}

pub fn list_by_business(conn: &mut DbConn, business_id: &str) -> Result<Vec<DbReviewFeature>> {
    let sql = format!(
        "SELECT {} FROM review_features WHERE business_id = ?1 ORDER BY row_index",
        SELECT_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![business_id], parse_review_feature_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count(conn: &mut DbConn) -> Result<usize> {
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM review_features", [], |row| row.get(0))
        .context("Failed to count review features")?;
    Ok(total as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::Resolution;
    use crate::database::{create_pool, get_connection, setup};
    use crate::domain::{parse_timestamp, Review};

    fn annotated(user: &str, resolution: Resolution) -> AnnotatedReview {
        AnnotatedReview {
            review: Review::new(user, "b1", 4.0, parse_timestamp("2018-01-01").unwrap()),
            community: "A".to_string(),
            resolution,
        }
    }

    #[test]
    fn test_insert_and_list_keeps_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(&dir.path().join("features.db")).unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::reset_database(&mut conn).unwrap();

        let rows = vec![
            annotated(
                "u1",
                Resolution::Community {
                    mean_rating: 4.5,
                    visit_share: 0.25,
                },
            ),
            annotated("u2", Resolution::NoData),
        ];
        assert_eq!(insert_annotated_reviews(&mut conn, &rows).unwrap(), 2);
        assert_eq!(count(&mut conn).unwrap(), 2);

        let stored = list_by_business(&mut conn, "b1").unwrap();
        assert_eq!(stored[0].user_id, "u1");
        assert_eq!(stored[0].community_mean_rating, Some(4.5));
        assert_eq!(stored[0].resolution, "community");
        assert_eq!(stored[1].row_index, 1);
        assert_eq!(stored[1].community_mean_rating, None);
        assert_eq!(stored[1].community_visit_share, None);
        assert_eq!(stored[1].date, rows[1].review.date);
    }
}
