// CHRONOREEL Real-Photo Matcher
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::pipeline::catalog::RealAsset;

/// Candidates must be strictly closer than this many years.
pub const YEAR_TOLERANCE: i32 = 15;

/// Real photos already allocated in the current run. Append-only.
#[derive(Debug, Default, Clone)]
pub struct UsedImageSet {
    paths: HashSet<PathBuf>,
}

impl UsedImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Returns `false` if the path was already marked.
    pub fn mark(&mut self, path: &Path) -> bool {
        self.paths.insert(path.to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

pub trait PhotoMatcher {
    fn find_closest<'a>(
        &self,
        target_year: i32,
        pool: &'a [RealAsset],
        used: &UsedImageSet,
    ) -> Option<&'a RealAsset>;
}

/// Greedy closest-year search. Ties go to the earliest asset in pool order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClosestYearMatcher;

impl PhotoMatcher for ClosestYearMatcher {
    fn find_closest<'a>(
        &self,
        target_year: i32,
        pool: &'a [RealAsset],
        used: &UsedImageSet,
    ) -> Option<&'a RealAsset> {
        let mut best: Option<(&RealAsset, i32)> = None;

        for asset in pool {
            if used.contains(&asset.path) {
                continue;
            }
            let Some(year) = asset.year else {
                continue;
            };

            let diff = (year - target_year).abs();
            let improves = best.map_or(true, |(_, best_diff)| diff < best_diff);
            if improves && diff < YEAR_TOLERANCE {
                best = Some((asset, diff));
            }
        }

        best.map(|(asset, _)| asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(path: &str, date: &str) -> RealAsset {
        RealAsset::new(path, date)
    }

    #[test]
    fn test_boundary_fifteen_rejected() {
        let pool = vec![asset("a.jpg", "2001-01-01")];
        let hit = ClosestYearMatcher.find_closest(2016, &pool, &UsedImageSet::new());
        assert!(hit.is_none(), "diff == 15 must be rejected");
    }

    #[test]
    fn test_fourteen_accepted() {
        let pool = vec![asset("a.jpg", "1926-12-09")];
        let hit = ClosestYearMatcher.find_closest(1940, &pool, &UsedImageSet::new());
        assert_eq!(hit.map(|a| a.path.as_path()), Some(Path::new("a.jpg")));
    }

    #[test]
    fn test_tie_goes_to_first() {
        let pool = vec![asset("a", "2010-05-01"), asset("b", "2022-05-01")];
        let hit = ClosestYearMatcher.find_closest(2016, &pool, &UsedImageSet::new());
        assert_eq!(hit.unwrap().path, PathBuf::from("a"));
    }

    #[test]
    fn test_closest_wins_regardless_of_order() {
        let pool = vec![asset("far", "1930-01-01"), asset("near", "1955-01-01")];
        let hit = ClosestYearMatcher.find_closest(1957, &pool, &UsedImageSet::new());
        assert_eq!(hit.unwrap().path, PathBuf::from("near"));
    }

    #[test]
    fn test_skips_used_and_undated() {
        let pool = vec![
            asset("undated", "Unknown Date"),
            asset("used", "1957-01-01"),
            asset("free", "1960-01-01"),
        ];
        let mut used = UsedImageSet::new();
        assert!(used.mark(Path::new("used")));
        assert!(!used.mark(Path::new("used")));

        let hit = ClosestYearMatcher.find_closest(1957, &pool, &used);
        assert_eq!(hit.unwrap().path, PathBuf::from("free"));
    }
}
