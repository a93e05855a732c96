use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde_json::{Map, Value};

use crate::domain::CommunityPartition;
use crate::errors::{read_context, with_parse_context};

/// Loads a `{user_id: community}` JSON object produced by the clustering step
pub fn load_partition(path: &Path) -> Result<CommunityPartition> {
    let json =
        fs::read_to_string(path).with_context(|| read_context("community partition", path))?;
    let partition =
        parse_partition(&json).with_context(|| read_context("community partition", path))?;
    info!(
        "Loaded partition of {} users into {} communities from {}",
        partition.len(),
        partition.community_count(),
        path.display()
    );
    Ok(partition)
}

pub fn parse_partition(json: &str) -> Result<CommunityPartition> {
    let assignments: Map<String, Value> =
        with_parse_context(serde_json::from_str(json), "community partition")?;

    let mut partition = CommunityPartition::new();
    for (user_id, community) in assignments {
        let label = community_label(&community).with_context(|| {
            format!(
                "Community of user '{}' must be a string or number, got {}",
                user_id, community
            )
        })?;
        partition.assign(user_id, label);
    }
    Ok(partition)
}

fn community_label(value: &Value) -> Option<String> {
    match value {
        Value::String(label) => Some(label.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
