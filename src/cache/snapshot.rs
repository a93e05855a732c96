use serde::{Deserialize, Serialize};

use crate::community::{Column, CommunityMatrices};
use crate::domain::{BusinessId, CommunityId};

/// One (business, column) position across all three matrices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub business_id: BusinessId,
    /// `None` marks the dataset-wide column
    pub community: Option<CommunityId>,
    pub mean_rating: f64,
    pub visit_count: u64,
    pub visit_share: f64,
}

impl CellRecord {
    pub fn column(&self) -> Column {
        match &self.community {
            Some(label) => Column::community(label.clone()),
            None => Column::Global,
        }
    }
}

/// Serializable form of [`CommunityMatrices`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub date_cutoff: String,
    pub cells: Vec<CellRecord>,
}

impl MatrixSnapshot {
    pub fn from_matrices(matrices: &CommunityMatrices, date_cutoff: impl Into<String>) -> Self {
        let mut cells: Vec<CellRecord> = matrices
            .visit_count
            .cells()
            .filter_map(|(business, column, visit_count)| {
                let mean_rating = matrices.mean_rating.get(business, &column)?;
                let visit_share = matrices.visit_share.get(business, &column)?;
                Some(CellRecord {
                    business_id: business.clone(),
                    community: match column {
                        Column::Community(label) => Some(label),
                        Column::Global => None,
                    },
                    mean_rating,
                    visit_count,
                    visit_share,
                })
            })
            .collect();
        cells.sort_by(|a, b| {
            (&a.business_id, &a.community).cmp(&(&b.business_id, &b.community))
        });

        Self {
            date_cutoff: date_cutoff.into(),
            cells,
        }
    }

    pub fn into_matrices(self) -> CommunityMatrices {
        let mut matrices = CommunityMatrices::default();
        for cell in self.cells {
            let column = cell.column();
            matrices
                .mean_rating
                .insert(cell.business_id.clone(), column.clone(), cell.mean_rating);
            matrices
                .visit_count
                .insert(cell.business_id.clone(), column.clone(), cell.visit_count);
            matrices
                .visit_share
                .insert(cell.business_id, column, cell.visit_share);
        }
        matrices
    }
}
