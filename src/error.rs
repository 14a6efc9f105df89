// CHRONOREEL Error Taxonomy
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReelError>;

#[derive(Debug, Error)]
pub enum ReelError {
    /// The narration plan is required; nothing can run without it.
    #[error("required input not found: {0}")]
    MissingInput(PathBuf),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("segment id {0} appears more than once in the plan")]
    DuplicateSegment(u32),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a matched real photo failed. Recovered by synthetic fallback.
    #[error("failed to copy real photo {src} -> {dst}: {source}")]
    MatchFileIo {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} synthesis failed after {attempts} attempt(s): {message}")]
    SynthesisBackend {
        stage: &'static str,
        attempts: u32,
        message: String,
    },

    #[error("planner error: {0}")]
    Planner(String),

    #[error("assembly error: {0}")]
    Assembly(String),
}

impl ReelError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
