use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::DbMatrixCell;
use crate::cache::MatrixSnapshot;

/// Stores every cell of a matrix snapshot; the global column has a NULL community
pub fn insert_snapshot(conn: &mut DbConn, snapshot: &MatrixSnapshot) -> Result<usize> {
    let tx = conn.transaction().context("Failed to start transaction")?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO matrix_cells (business_id, community, mean_rating, visit_count, visit_share, date_cutoff) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        for cell in &snapshot.cells {
            stmt.execute(params![
                cell.business_id,
                cell.community,
                cell.mean_rating,
                cell.visit_count as i64,
                cell.visit_share,
                snapshot.date_cutoff,
            ])
            .with_context(|| format!("Failed to insert matrix cell for {}", cell.business_id))?;
        }
    }
    tx.commit().context("Failed to commit matrix cells")?;
    Ok(snapshot.cells.len())
}

fn parse_matrix_cell_row(row: &rusqlite::Row) -> rusqlite::Result<DbMatrixCell> {
    Ok(DbMatrixCell {
        id: row.get(0)?,
        business_id: row.get(1)?,
        community: row.get(2)?,
        mean_rating: row.get(3)?,
        visit_count: row.get(4)?,
        visit_share: row.get(5)?,
        date_cutoff: row.get(6)?,
    })
}

pub fn list_by_business(conn: &mut DbConn, business_id: &str) -> Result<Vec<DbMatrixCell>> {
    let sql = "SELECT id, business_id, community, mean_rating, visit_count, visit_share, date_cutoff FROM matrix_cells WHERE business_id = ?1 ORDER BY community";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![business_id], parse_matrix_cell_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
