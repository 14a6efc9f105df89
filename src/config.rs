// CHRONOREEL Configuration
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Environment-driven defaults (loaded through `.env` by main). CLI flags
// override individual fields per invocation.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::pipeline::retry::RetryPolicy;

pub const DEFAULT_PLAN_FILE: &str = "video_plan.json";
pub const DEFAULT_ASSETS_FILE: &str = "available_assets.json";
pub const DEFAULT_OUTPUT_DIR: &str = "assets";
pub const DEFAULT_VOICE: &str = "en-US-ChristopherNeural";
pub const DEFAULT_IMAGE_API_URL: &str =
    "https://router.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";
pub const DEFAULT_LLM_API_URL: &str = "http://localhost:11434/v1";
/// Upper bound for one backend call (HTTP request or TTS subprocess).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct ReelConfig {
    pub output_dir: PathBuf,
    pub voice: String,
    pub image_api_url: String,
    pub hf_token: Option<String>,
    pub llm_api_url: String,
    pub llm_api_key: Option<String>,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            voice: DEFAULT_VOICE.to_string(),
            image_api_url: DEFAULT_IMAGE_API_URL.to_string(),
            hf_token: None,
            llm_api_url: DEFAULT_LLM_API_URL.to_string(),
            llm_api_key: None,
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ReelConfig {
    /// Build a config from `CHRONOREEL_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("CHRONOREEL_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(voice) = lookup("CHRONOREEL_VOICE") {
            config.voice = voice;
        }
        if let Some(url) = lookup("CHRONOREEL_IMAGE_API_URL") {
            config.image_api_url = url;
        }
        if let Some(url) = lookup("CHRONOREEL_LLM_API_URL") {
            config.llm_api_url = url;
        }
        config.hf_token = lookup("HF_TOKEN").filter(|t| !t.trim().is_empty());
        config.llm_api_key = lookup("LLM_API_KEY").filter(|t| !t.trim().is_empty());

        if let Some(raw) = lookup("CHRONOREEL_RETRY_ATTEMPTS") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.retry.max_attempts = n,
                _ => warn!("[CONFIG] Ignoring invalid CHRONOREEL_RETRY_ATTEMPTS={:?}", raw),
            }
        }
        if let Some(raw) = lookup("CHRONOREEL_RETRY_DELAY_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.retry.delay = Duration::from_secs(secs),
                Err(_) => warn!("[CONFIG] Ignoring invalid CHRONOREEL_RETRY_DELAY_SECS={:?}", raw),
            }
        }

        if let Some(raw) = lookup("CHRONOREEL_REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => warn!("[CONFIG] Ignoring invalid CHRONOREEL_REQUEST_TIMEOUT_SECS={:?}", raw),
            }
        }

        config
    }
}
