// CHRONOREEL Hybrid Asset Pipeline
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL

pub mod catalog;
pub mod decision;
pub mod era;
pub mod matcher;
pub mod materializer;
pub mod retry;
pub mod run;
pub mod synthesis;

pub use catalog::{RealAsset, Segment};
pub use decision::{AssetChoice, AssetDecision, DecisionKind, HybridEngine};
pub use era::{classify, EraClassification, Theme};
pub use matcher::{ClosestYearMatcher, PhotoMatcher, UsedImageSet};
pub use materializer::{ImageOutcome, MaterializedSegment, Materializer};
pub use retry::RetryPolicy;
pub use run::{AssetRun, RunReport};
pub use synthesis::{StudioBackend, SynthesisBackend};
