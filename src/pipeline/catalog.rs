// CHRONOREEL Asset Catalog Loader
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Reads the narration plan and the real-image inventory produced by the
// upstream tools into typed, read-only structures.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ReelError, Result};

pub const UNKNOWN_DATE: &str = "Unknown Date";

/// One unit of the narration plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub id: u32,
    pub narration: String,
    pub image_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPlan {
    pub segments: Vec<Segment>,
}

/// Raw inventory entry as written by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub filename: String,
    pub path: PathBuf,
}

/// Archival image eligible for reuse.
#[derive(Debug, Clone, PartialEq)]
pub struct RealAsset {
    pub path: PathBuf,
    pub date: String,
    pub year: Option<i32>,
}

impl RealAsset {
    pub fn new(path: impl Into<PathBuf>, date: impl Into<String>) -> Self {
        let date = date.into();
        let year = parse_year(&date);
        Self {
            path: path.into(),
            date,
            year,
        }
    }
}

impl From<AssetRecord> for RealAsset {
    fn from(record: AssetRecord) -> Self {
        RealAsset::new(record.path, record.date)
    }
}

/// Year component of a `YYYY-MM-DD` date; `None` for "Unknown Date" and junk.
pub fn parse_year(date: &str) -> Option<i32> {
    date.split('-').next()?.trim().parse().ok()
}

pub fn load_plan(path: &Path) -> Result<Vec<Segment>> {
    if !path.exists() {
        return Err(ReelError::MissingInput(path.to_path_buf()));
    }
    let json = fs::read_to_string(path).map_err(|e| ReelError::io(path, e))?;
    let plan: VideoPlan = serde_json::from_str(&json).map_err(|source| ReelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    for segment in &plan.segments {
        if !seen.insert(segment.id) {
            return Err(ReelError::DuplicateSegment(segment.id));
        }
    }

    info!("[CATALOG] 📜 Loaded {} segments from {:?}", plan.segments.len(), path);
    Ok(plan.segments)
}

/// A missing inventory is not fatal: the pool is empty and every segment
/// falls back to synthesis.
pub fn load_pool(path: &Path) -> Result<Vec<RealAsset>> {
    if !path.exists() {
        warn!(
            "[CATALOG] ⚠️ Asset pool {:?} not found. All segments will use synthetic images.",
            path
        );
        return Ok(Vec::new());
    }

    let json = fs::read_to_string(path).map_err(|e| ReelError::io(path, e))?;
    let records: Vec<AssetRecord> =
        serde_json::from_str(&json).map_err(|source| ReelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let total = records.len();

    let pool: Vec<RealAsset> = records
        .into_iter()
        .filter(|r| r.kind == "image")
        .map(RealAsset::from)
        .collect();

    let dated = pool.iter().filter(|a| a.year.is_some()).count();
    info!(
        "[CATALOG] 📸 Asset pool: {} images ({} dated) out of {} records",
        pool.len(),
        dated,
        total
    );
    if pool.is_empty() {
        warn!("[CATALOG] ⚠️ Asset pool is empty. All segments will use synthetic images.");
    }
    Ok(pool)
}

pub fn load_catalog(plan_path: &Path, pool_path: &Path) -> Result<(Vec<Segment>, Vec<RealAsset>)> {
    let segments = load_plan(plan_path)?;
    let pool = load_pool(pool_path)?;
    Ok((segments, pool))
}
