// CHRONOREEL Hybrid Run Orchestrator
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Drives classify -> decide -> materialize for every segment, strictly in
// plan order. A segment's decision (and its used-set mark) is committed
// before the next segment is looked at. Failures stay local to a segment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::error::{ReelError, Result};
use crate::pipeline::catalog::{RealAsset, Segment};
use crate::pipeline::decision::{AssetDecision, HybridEngine};
use crate::pipeline::era::classify;
use crate::pipeline::materializer::{ImageOutcome, MaterializedSegment, Materializer};
use crate::pipeline::matcher::{ClosestYearMatcher, PhotoMatcher};

pub const REPORT_FILE: &str = "run_report.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSegment {
    pub segment_id: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub real_photos: usize,
    pub synthetic: usize,
    /// Segments whose real photo could not be copied. The photo stays burned.
    pub recovered: Vec<u32>,
    pub skipped: Vec<SkippedSegment>,
    pub pool_empty: bool,
    pub decisions: Vec<AssetDecision>,
    pub materialized: Vec<MaterializedSegment>,
}

impl RunReport {
    fn record(&mut self, done: MaterializedSegment) {
        match done.image {
            ImageOutcome::CopiedReal => self.real_photos += 1,
            ImageOutcome::Recovered => {
                self.synthetic += 1;
                self.recovered.push(done.segment_id);
            }
            ImageOutcome::Synthesized(_) | ImageOutcome::Cached => self.synthetic += 1,
        }
        self.materialized.push(done);
    }

    fn skip(&mut self, segment_id: u32, reason: String) {
        self.skipped.push(SkippedSegment { segment_id, reason });
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![
            "CHRONOREEL Asset Report".to_string(),
            format!("  Real photos: {}", self.real_photos),
            format!("  Synthetic:   {}", self.synthetic),
        ];
        if self.pool_empty {
            lines.push("  Asset pool was empty: every segment used synthesis".to_string());
        }
        if !self.recovered.is_empty() {
            lines.push(format!("  Recovered after copy failure: {:?}", self.recovered));
        }
        if self.skipped.is_empty() {
            lines.push("  Skipped: none".to_string());
        } else {
            lines.push(format!("  Skipped: {}", self.skipped.len()));
            for s in &self.skipped {
                lines.push(format!("    - segment {}: {}", s.segment_id, s.reason));
            }
        }
        lines.join("\n")
    }

    pub fn save(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| ReelError::Serialize {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|e| ReelError::io(&path, e))?;
        info!("[RUN] 💾 Report saved: {:?}", path);
        Ok(path)
    }
}

pub struct AssetRun<M: PhotoMatcher = ClosestYearMatcher> {
    engine: HybridEngine<M>,
    materializer: Materializer,
}

impl AssetRun<ClosestYearMatcher> {
    pub fn new(materializer: Materializer) -> Self {
        Self::with_engine(HybridEngine::new(), materializer)
    }
}

impl<M: PhotoMatcher> AssetRun<M> {
    pub fn with_engine(engine: HybridEngine<M>, materializer: Materializer) -> Self {
        Self {
            engine,
            materializer,
        }
    }

    /// Consumes the run; the used set does not outlive it.
    pub async fn execute(mut self, segments: &[Segment], pool: &[RealAsset]) -> Result<RunReport> {
        self.materializer.prepare().await?;

        let mut report = RunReport {
            pool_empty: pool.is_empty(),
            ..RunReport::default()
        };
        if report.pool_empty {
            warn!("[RUN] ⚠️ Empty asset pool: all segments route to synthesis.");
        }

        info!("[RUN] 🚀 Starting hybrid generation for {} segments...", segments.len());

        for segment in segments {
            let classification = classify(&segment.narration);
            let decision = self.engine.decide(segment, &classification, pool);
            report.decisions.push(decision.clone());

            match self.materializer.materialize(segment, &decision).await {
                Ok(done) => report.record(done),
                Err(e) => {
                    error!("[RUN] ❌ Segment {} skipped: {}", segment.id, e);
                    if let Err(cleanup) = self.materializer.discard(segment.id).await {
                        warn!("[RUN] ⚠️ Segment {} left files behind: {}", segment.id, cleanup);
                    }
                    report.skip(segment.id, e.to_string());
                }
            }
        }

        info!("{}", report.summary());
        Ok(report)
    }
}

/// Decisions only, no I/O. Used by `--dry-run`.
pub fn plan_decisions(segments: &[Segment], pool: &[RealAsset]) -> Vec<AssetDecision> {
    let mut engine = HybridEngine::new();
    segments
        .iter()
        .map(|segment| engine.decide(segment, &classify(&segment.narration), pool))
        .collect()
}
