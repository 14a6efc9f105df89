// CHRONOREEL Inventory Scanner
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Walks an archive tree and indexes every still image, dated by the first
// YYYY-MM-DD found in its directory path.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{ReelError, Result};
use crate::pipeline::catalog::{AssetRecord, UNKNOWN_DATE};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "avif"];
const SKIPPED_DIRS: [&str; 2] = [".git", "__pycache__"];

fn date_pattern() -> &'static Regex {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    DATE_RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("static date pattern"))
}

/// First YYYY-MM-DD stamp in `text`.
pub fn extract_date(text: &str) -> Option<&str> {
    date_pattern().find(text).map(|m| m.as_str())
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| SKIPPED_DIRS.contains(&name))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| {
            IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
}

pub fn scan_inventory(root: &Path) -> Result<Vec<AssetRecord>> {
    if !root.is_dir() {
        return Err(ReelError::MissingInput(root.to_path_buf()));
    }
    info!("[SCAN] 🚀 Scanning {:?}", root);

    let mut records = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_skipped(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("[SCAN] Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image(path) {
            continue;
        }

        let dir = path.parent().unwrap_or(root).to_string_lossy();
        let date = extract_date(&dir).unwrap_or(UNKNOWN_DATE).to_string();
        let filename = entry.file_name().to_string_lossy().into_owned();
        debug!("[SCAN] {} ({})", filename, date);

        records.push(AssetRecord {
            kind: "image".to_string(),
            date,
            filename,
            path: path.to_path_buf(),
        });
    }

    // Stable: equal dates keep walk order.
    records.sort_by(|a, b| a.date.cmp(&b.date));
    info!("[SCAN] 📸 Indexed {} images", records.len());
    Ok(records)
}

pub fn write_inventory(records: &[AssetRecord], output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(|source| ReelError::Serialize {
        path: output.to_path_buf(),
        source,
    })?;
    fs::write(output, json).map_err(|e| ReelError::io(output, e))?;
    info!("[SCAN] 💾 Inventory written to {:?}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extract_date() {
        assert_eq!(
            extract_date("news/1976-03-11_jubilee/photos"),
            Some("1976-03-11")
        );
        assert_eq!(extract_date("news/1976-3-11"), None);
        assert_eq!(extract_date("short"), None);
        assert_eq!(extract_date("héllo 2016-09-01"), Some("2016-09-01"));
    }

    #[test]
    fn test_extract_date_takes_first_stamp() {
        assert_eq!(
            extract_date("2016-07-01/reprint_of/1926-12-09"),
            Some("2016-07-01")
        );
        assert_eq!(extract_date("scan_19761120"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_unserializable_inventory_reports_serialize_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let output = dir.path().join("available_assets.json");
        let records = vec![AssetRecord {
            kind: "image".to_string(),
            date: UNKNOWN_DATE.to_string(),
            filename: "bad.jpg".to_string(),
            path: Path::new(OsStr::from_bytes(b"archive/\xFF/bad.jpg")).to_path_buf(),
        }];

        match write_inventory(&records, &output) {
            Err(ReelError::Serialize { path, .. }) => assert_eq!(path, output),
            other => panic!("expected a serialize error, got {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_scan_dates_filters_and_sorts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let late = root.join("news/2016-05-01");
        let early = root.join("news/1926-12-09");
        let git = root.join(".git/objects");
        for d in [&late, &early, &git] {
            fs::create_dir_all(d).unwrap();
        }
        fs::write(late.join("iit.PNG"), b"x").unwrap();
        fs::write(early.join("gate.jpg"), b"x").unwrap();
        fs::write(early.join("notes.pdf"), b"x").unwrap();
        fs::write(git.join("hidden.jpg"), b"x").unwrap();
        fs::write(root.join("loose.jpeg"), b"x").unwrap();

        let records = scan_inventory(root).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["gate.jpg", "iit.PNG", "loose.jpeg"]);
        assert_eq!(records[0].date, "1926-12-09");
        assert_eq!(records[2].date, UNKNOWN_DATE);
        assert!(records.iter().all(|r| r.kind == "image"));
    }
}
