use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::Xxh3;

use super::snapshot::MatrixSnapshot;
use crate::community::CommunityMatrices;
use crate::config::ColumnNames;
use crate::domain::DateCutoff;
use crate::errors::read_context;

/// File-based cache of built community matrices
pub struct MatrixCache {
    cache_dir: PathBuf,
}

impl MatrixCache {
    /// Create a new cache instance
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        fs::create_dir_all(&cache_dir).context("Failed to create matrix cache directory")?;

        Ok(Self { cache_dir })
    }

    /// Key identifying one (dataset, partition, cutoff) build.
    ///
    /// File stems keep the key readable; the trailing fingerprint covers the
    /// contents of both inputs and the column names, so an edited or moved
    /// input never maps onto an older entry.
    pub fn key_for(
        reviews: &Path,
        partition: &Path,
        columns: &ColumnNames,
        cutoff: &DateCutoff,
    ) -> Result<String> {
        let reviews_bytes =
            fs::read(reviews).with_context(|| read_context("review log", reviews))?;
        let partition_bytes =
            fs::read(partition).with_context(|| read_context("community partition", partition))?;
        let fingerprint = fingerprint(&reviews_bytes, &partition_bytes, columns);

        let raw = format!(
            "{}__{}__{}__{:016x}",
            file_stem(reviews),
            file_stem(partition),
            cutoff,
            fingerprint
        );
        Ok(raw
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' => c,
                _ => '-',
            })
            .collect())
    }

    pub fn save_matrices(
        &self,
        key: &str,
        matrices: &CommunityMatrices,
        cutoff: &DateCutoff,
    ) -> Result<()> {
        let snapshot = MatrixSnapshot::from_matrices(matrices, cutoff.to_string());
        let file_path = self.build_path(key);
        self.write_json(&file_path, &snapshot)?;
        info!("Saved matrices to cache: {}", file_path.display());
        Ok(())
    }

    pub fn load_matrices(&self, key: &str) -> Result<Option<CommunityMatrices>> {
        let file_path = self.build_path(key);
        let snapshot: Option<MatrixSnapshot> = self.read_json_opt(&file_path)?;
        if snapshot.is_some() {
            info!("Loaded matrices from cache: {}", file_path.display());
        }
        Ok(snapshot.map(MatrixSnapshot::into_matrices))
    }

    // --- Helper Methods ---

    fn build_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
        fs::write(path, json).context("Failed to write cache file")?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}

fn fingerprint(reviews: &[u8], partition: &[u8], columns: &ColumnNames) -> u64 {
    let mut hasher = Xxh3::new();
    // Length prefixes keep field boundaries unambiguous.
    for part in [
        reviews,
        partition,
        columns.user.as_bytes(),
        columns.business.as_bytes(),
        columns.rating.as_bytes(),
        columns.date.as_bytes(),
    ] {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hasher.digest()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
