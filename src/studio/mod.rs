// CHRONOREEL Studio Tools
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Everything around the asset pipeline: indexing the archive, drafting the
// script, checking tools, and stitching the final cut.

pub mod assembler;
pub mod health;
pub mod planner;
pub mod scanner;
