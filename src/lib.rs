// CHRONOREEL Core Library
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL

pub mod config;
pub mod error;
pub mod pipeline;
pub mod studio;

pub use error::{ReelError, Result};
