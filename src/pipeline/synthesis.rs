// CHRONOREEL Synthesis Backends
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// The capability object handed to the materializer. Speech goes through the
// edge-tts CLI, images through an HTTP text-to-image endpoint that answers
// with raw image bytes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

use crate::config::{ReelConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::pipeline::era::Theme;

#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>>;

    /// `prompt` already carries the theme qualifiers; `style` is informational.
    async fn synthesize_image(&self, prompt: &str, style: Theme) -> Result<Vec<u8>>;
}

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct EdgeTtsSpeech {
    program: String,
    voice: String,
    timeout: Duration,
}

impl EdgeTtsSpeech {
    pub fn new(voice: &str) -> Self {
        Self {
            program: "edge-tts".to_string(),
            voice: voice.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    fn scratch_path() -> PathBuf {
        let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("chronoreel_tts_{}_{}.mp3", std::process::id(), n))
    }

    pub async fn speak(&self, text: &str) -> Result<Vec<u8>> {
        let scratch = Self::scratch_path();
        info!("[TTS] 🎙️ Synthesizing {} chars with {}", text.len(), self.voice);

        let run = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program)
                .arg("--voice")
                .arg(&self.voice)
                .arg("--text")
                .arg(text)
                .arg("--write-media")
                .arg(&scratch)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match run {
            Ok(result) => result.with_context(|| format!("Failed to execute {}", self.program))?,
            Err(_) => {
                let _ = tokio::fs::remove_file(&scratch).await;
                anyhow::bail!("{} timed out after {:?}", self.program, self.timeout);
            }
        };

        if !output.status.success() {
            let _ = tokio::fs::remove_file(&scratch).await;
            anyhow::bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let bytes = tokio::fs::read(&scratch)
            .await
            .with_context(|| format!("TTS output missing at {:?}", scratch))?;
        let _ = tokio::fs::remove_file(&scratch).await;

        if bytes.is_empty() {
            anyhow::bail!("{} produced an empty file", self.program);
        }
        Ok(bytes)
    }
}

pub struct HttpImageSynth {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpImageSynth {
    pub fn new(api_url: &str, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_url: api_url.to_string(),
            token,
        }
    }

    pub async fn render(&self, prompt: &str, style: Theme) -> Result<Vec<u8>> {
        info!("[IMAGE] 🎨 Requesting {} image from {}", style, self.api_url);

        let mut request = self
            .client
            .post(&self.api_url)
            .json(&json!({ "inputs": prompt }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .with_context(|| format!("Image API unreachable: {}", self.api_url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Image API error {}: {}", status, body.trim());
        }

        let bytes = resp.bytes().await.context("Failed to read image body")?;
        Ok(bytes.to_vec())
    }
}

/// Production backend: edge-tts narration plus HTTP diffusion stills.
pub struct StudioBackend {
    speech: EdgeTtsSpeech,
    image: HttpImageSynth,
}

impl StudioBackend {
    pub fn new(speech: EdgeTtsSpeech, image: HttpImageSynth) -> Self {
        Self { speech, image }
    }

    pub fn from_config(config: &ReelConfig) -> Self {
        Self::new(
            EdgeTtsSpeech::new(&config.voice).with_timeout(config.request_timeout),
            HttpImageSynth::new(
                &config.image_api_url,
                config.hf_token.clone(),
                config.request_timeout,
            ),
        )
    }
}

#[async_trait]
impl SynthesisBackend for StudioBackend {
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>> {
        self.speech.speak(text).await
    }

    async fn synthesize_image(&self, prompt: &str, style: Theme) -> Result<Vec<u8>> {
        self.image.render(prompt, style).await
    }
}
