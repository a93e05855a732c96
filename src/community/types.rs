use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::domain::{BusinessId, CommunityId};

/// Label used for the dataset-wide column when matrices leave the process
pub const GLOBAL_LABEL: &str = "all_dataset";

/// Column axis of a statistic matrix: a real community or the synthetic global aggregate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Community(CommunityId),
    Global,
}

impl Column {
    pub fn community(label: impl Into<CommunityId>) -> Self {
        Column::Community(label.into())
    }

    pub fn label(&self) -> &str {
        match self {
            Column::Community(label) => label,
            Column::Global => GLOBAL_LABEL,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cells of one business row. Absent entries mean "no observations", never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow<T> {
    communities: HashMap<CommunityId, T>,
    global: Option<T>,
}

impl<T> Default for MatrixRow<T> {
    fn default() -> Self {
        Self {
            communities: HashMap::new(),
            global: None,
        }
    }
}

impl<T: Copy> MatrixRow<T> {
    pub fn community(&self, community: &str) -> Option<T> {
        self.communities.get(community).copied()
    }

    pub fn global(&self) -> Option<T> {
        self.global
    }

    pub fn communities(&self) -> impl Iterator<Item = (&CommunityId, T)> {
        self.communities.iter().map(|(label, &value)| (label, value))
    }
}

/// Business x community table keyed sparsely by business, then column
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    rows: HashMap<BusinessId, MatrixRow<T>>,
}

impl<T> Default for SparseMatrix<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<T: Copy> SparseMatrix<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, business: impl Into<BusinessId>, column: Column, value: T) {
        let row = self.rows.entry(business.into()).or_default();
        match column {
            Column::Community(label) => {
                row.communities.insert(label, value);
            }
            Column::Global => row.global = Some(value),
        }
    }

    pub fn get(&self, business: &str, column: &Column) -> Option<T> {
        match column {
            Column::Community(label) => self.community(business, label),
            Column::Global => self.global(business),
        }
    }

    pub fn community(&self, business: &str, community: &str) -> Option<T> {
        self.rows.get(business)?.community(community)
    }

    pub fn global(&self, business: &str) -> Option<T> {
        self.rows.get(business)?.global()
    }

    pub fn row(&self, business: &str) -> Option<&MatrixRow<T>> {
        self.rows.get(business)
    }

    pub fn has_row(&self, business: &str) -> bool {
        self.rows.contains_key(business)
    }

    pub fn businesses(&self) -> impl Iterator<Item = &BusinessId> {
        self.rows.keys()
    }

    /// Distinct real community columns that hold at least one cell
    pub fn community_columns(&self) -> BTreeSet<&CommunityId> {
        self.rows
            .values()
            .flat_map(|row| row.communities.keys())
            .collect()
    }

    /// Every present cell, in no particular order
    pub fn cells(&self) -> impl Iterator<Item = (&BusinessId, Column, T)> {
        self.rows.iter().flat_map(|(business, row)| {
            let communities = row
                .communities
                .iter()
                .map(move |(label, &value)| (business, Column::Community(label.clone()), value));
            let global = row.global.map(|value| (business, Column::Global, value));
            communities.chain(global)
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// The three aligned statistic matrices produced by one matrix build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunityMatrices {
    pub mean_rating: SparseMatrix<f64>,
    pub visit_count: SparseMatrix<u64>,
    pub visit_share: SparseMatrix<f64>,
}

impl CommunityMatrices {
    /// A business has a row only if it was reviewed before the cutoff
    pub fn has_business(&self, business: &str) -> bool {
        self.visit_count.has_row(business)
    }

    pub fn business_count(&self) -> usize {
        self.visit_count.row_count()
    }
}
