// CHRONOREEL Hybrid Decision Engine
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Per-segment state machine:
//
//   ForceSynthetic  celebration era -> synthesize (red), matcher untouched
//   TryReal         matcher hit     -> reuse real photo, path marked used
//                   matcher miss    -> synthesize (vintage / photorealistic)
//
// The only side effect is the `used` mutation. Marks are never rolled back,
// even if the copy later fails and the segment degrades to synthesis.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::pipeline::catalog::{RealAsset, Segment};
use crate::pipeline::era::{EraClassification, Theme};
use crate::pipeline::matcher::{ClosestYearMatcher, PhotoMatcher, UsedImageSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    ReuseReal,
    SynthesizeAi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssetChoice {
    ReuseReal { source: PathBuf, date: String },
    SynthesizeAi { style: Theme },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDecision {
    pub segment_id: u32,
    pub choice: AssetChoice,
}

impl AssetDecision {
    pub fn synthesize(segment_id: u32, style: Theme) -> Self {
        Self {
            segment_id,
            choice: AssetChoice::SynthesizeAi { style },
        }
    }

    pub fn kind(&self) -> DecisionKind {
        match self.choice {
            AssetChoice::ReuseReal { .. } => DecisionKind::ReuseReal,
            AssetChoice::SynthesizeAi { .. } => DecisionKind::SynthesizeAi,
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        match &self.choice {
            AssetChoice::ReuseReal { source, .. } => Some(source),
            AssetChoice::SynthesizeAi { .. } => None,
        }
    }

    pub fn style(&self) -> Option<Theme> {
        match self.choice {
            AssetChoice::ReuseReal { .. } => None,
            AssetChoice::SynthesizeAi { style } => Some(style),
        }
    }
}

/// Decide one segment. Mutates `used` only when committing to a real photo.
pub fn decide<M: PhotoMatcher + ?Sized>(
    matcher: &M,
    segment: &Segment,
    classification: &EraClassification,
    pool: &[RealAsset],
    used: &mut UsedImageSet,
) -> AssetDecision {
    if classification.is_celebration() {
        info!(
            "[ENGINE] 🔹 Segment {}: Future event detected. Using AI ({}).",
            segment.id,
            Theme::GlowingRedCelebration
        );
        return AssetDecision::synthesize(segment.id, Theme::GlowingRedCelebration);
    }

    let target_year = classification.target_year;
    match matcher.find_closest(target_year, pool, used) {
        Some(asset) => {
            used.mark(&asset.path);
            info!(
                "[ENGINE] 🔹 Segment {}: Real photo {:?} ({}) for {}",
                segment.id, asset.path, asset.date, target_year
            );
            AssetDecision {
                segment_id: segment.id,
                choice: AssetChoice::ReuseReal {
                    source: asset.path.clone(),
                    date: asset.date.clone(),
                },
            }
        }
        None => {
            let style = Theme::for_year(target_year);
            info!(
                "[ENGINE] 🔹 Segment {}: No real photo for {}. Using AI ({}).",
                segment.id, target_year, style
            );
            AssetDecision::synthesize(segment.id, style)
        }
    }
}

/// Owns the run-scoped used set. One engine per run; segments must be fed in
/// plan order.
pub struct HybridEngine<M: PhotoMatcher = ClosestYearMatcher> {
    matcher: M,
    used: UsedImageSet,
}

impl HybridEngine<ClosestYearMatcher> {
    pub fn new() -> Self {
        Self::with_matcher(ClosestYearMatcher)
    }
}

impl Default for HybridEngine<ClosestYearMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: PhotoMatcher> HybridEngine<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self {
            matcher,
            used: UsedImageSet::new(),
        }
    }

    pub fn decide(
        &mut self,
        segment: &Segment,
        classification: &EraClassification,
        pool: &[RealAsset],
    ) -> AssetDecision {
        decide(&self.matcher, segment, classification, pool, &mut self.used)
    }

    pub fn used(&self) -> &UsedImageSet {
        &self.used
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::era::classify;
    use std::cell::Cell;

    struct CountingMatcher {
        calls: Cell<usize>,
    }

    impl PhotoMatcher for CountingMatcher {
        fn find_closest<'a>(
            &self,
            target_year: i32,
            pool: &'a [RealAsset],
            used: &UsedImageSet,
        ) -> Option<&'a RealAsset> {
            self.calls.set(self.calls.get() + 1);
            ClosestYearMatcher.find_closest(target_year, pool, used)
        }
    }

    fn segment(id: u32, narration: &str) -> Segment {
        Segment {
            id,
            narration: narration.to_string(),
            image_prompt: format!("prompt {}", id),
        }
    }

    #[test]
    fn test_celebration_never_calls_matcher() {
        let pool = vec![RealAsset::new("2020.jpg", "2020-01-01")];
        let mut engine = HybridEngine::with_matcher(CountingMatcher { calls: Cell::new(0) });

        let seg = segment(8, "The centenary in 2026 glows red");
        let decision = engine.decide(&seg, &classify(&seg.narration), &pool);

        assert_eq!(decision.style(), Some(Theme::GlowingRedCelebration));
        assert_eq!(engine.matcher().calls.get(), 0);
        assert!(engine.used().is_empty());
    }

    #[test]
    fn test_scarcity_goes_to_earlier_segment() {
        let pool = vec![RealAsset::new("founding.jpg", "1926-12-09")];
        let mut engine = HybridEngine::new();

        let first = segment(1, "Founded in 1926");
        let second = segment(2, "Also in 1926, the first cohort");

        let d1 = engine.decide(&first, &classify(&first.narration), &pool);
        let d2 = engine.decide(&second, &classify(&second.narration), &pool);

        assert_eq!(d1.kind(), DecisionKind::ReuseReal);
        assert_eq!(d1.source_path(), Some(Path::new("founding.jpg")));
        assert_eq!(d2.kind(), DecisionKind::SynthesizeAi);
        assert_eq!(d2.style(), Some(Theme::VintageMonochrome));
    }

    #[test]
    fn test_miss_after_cutoff_is_photorealistic() {
        let mut engine = HybridEngine::new();
        let seg = segment(4, "IIT status in 2016");
        let decision = engine.decide(&seg, &classify(&seg.narration), &[]);
        assert_eq!(decision.style(), Some(Theme::Photorealistic));
        assert!(decision.source_path().is_none());
    }
}
