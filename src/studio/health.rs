// CHRONOREEL Dependency Health Check
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL

use std::process::{Command, Stdio};
use tracing::{info, warn};

/// External tools and the flag each answers to with a zero exit code.
pub const REQUIRED_TOOLS: [(&str, &str); 3] = [
    ("ffmpeg", "-version"),
    ("ffprobe", "-version"),
    ("edge-tts", "--help"),
];

pub fn tool_available(program: &str, probe_arg: &str) -> bool {
    Command::new(program)
        .arg(probe_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Names of required tools that could not be launched.
pub fn check_dependencies() -> Vec<&'static str> {
    REQUIRED_TOOLS
        .iter()
        .filter(|(program, arg)| !tool_available(program, arg))
        .map(|(program, _)| *program)
        .collect()
}

pub fn report_dependencies() -> bool {
    let missing = check_dependencies();
    if missing.is_empty() {
        info!("[HEALTH] ✅ All external tools found.");
        true
    } else {
        for tool in &missing {
            warn!("[HEALTH] ⚠️ Missing dependency: {}", tool);
        }
        false
    }
}
