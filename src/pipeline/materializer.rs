// CHRONOREEL Asset Materializer
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Turns a decision into files on disk:
//   <out>/audio_<id>.mp3
//   <out>/image_<id>.jpg
// These paths are the contract with the assembler.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ReelError, Result};
use crate::pipeline::catalog::Segment;
use crate::pipeline::decision::{AssetChoice, AssetDecision};
use crate::pipeline::era::Theme;
use crate::pipeline::retry::RetryPolicy;
use crate::pipeline::synthesis::SynthesisBackend;

pub const AUDIO_EXT: &str = "mp3";
pub const IMAGE_EXT: &str = "jpg";
/// Synthetic stills at or below this size are treated as broken leftovers.
pub const MIN_CACHED_IMAGE_BYTES: u64 = 1000;

pub fn audio_path(output_dir: &Path, segment_id: u32) -> PathBuf {
    output_dir.join(format!("audio_{}.{}", segment_id, AUDIO_EXT))
}

pub fn image_path(output_dir: &Path, segment_id: u32) -> PathBuf {
    output_dir.join(format!("image_{}.{}", segment_id, IMAGE_EXT))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageOutcome {
    CopiedReal,
    Synthesized(Theme),
    /// Real copy failed; a photorealistic still was generated instead.
    Recovered,
    Cached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedSegment {
    pub segment_id: u32,
    pub audio_path: PathBuf,
    pub image_path: PathBuf,
    pub audio_cached: bool,
    pub image: ImageOutcome,
}

pub struct Materializer {
    backend: Arc<dyn SynthesisBackend>,
    retry: RetryPolicy,
    output_dir: PathBuf,
    reuse_images: bool,
}

impl Materializer {
    pub fn new(backend: Arc<dyn SynthesisBackend>, output_dir: &Path, retry: RetryPolicy) -> Self {
        Self {
            backend,
            retry,
            output_dir: output_dir.to_path_buf(),
            reuse_images: true,
        }
    }

    /// Whether existing synthetic stills are kept on re-runs.
    pub fn reuse_existing_images(mut self, reuse: bool) -> Self {
        self.reuse_images = reuse;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ReelError::io(&self.output_dir, e))
    }

    /// Drops whatever this segment left behind so the assembler never pairs
    /// a skipped segment. Missing files are fine.
    pub async fn discard(&self, segment_id: u32) -> Result<()> {
        for path in [
            audio_path(&self.output_dir, segment_id),
            image_path(&self.output_dir, segment_id),
        ] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => info!("[MATERIALIZE] 🧹 Removed {:?}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(ReelError::io(&path, e)),
            }
        }
        Ok(())
    }

    /// Audio first, then image. A narration failure skips the image entirely.
    pub async fn materialize(
        &self,
        segment: &Segment,
        decision: &AssetDecision,
    ) -> Result<MaterializedSegment> {
        let audio = audio_path(&self.output_dir, segment.id);
        let image = image_path(&self.output_dir, segment.id);

        let audio_cached = self.materialize_audio(segment, &audio).await?;
        let outcome = self.materialize_image(segment, decision, &image).await?;

        Ok(MaterializedSegment {
            segment_id: segment.id,
            audio_path: audio,
            image_path: image,
            audio_cached,
            image: outcome,
        })
    }

    /// Returns `true` when an existing non-empty file was kept.
    async fn materialize_audio(&self, segment: &Segment, dst: &Path) -> Result<bool> {
        if non_empty(dst).await {
            info!("[MATERIALIZE] (Audio exists: {:?})", dst);
            return Ok(true);
        }

        info!("[MATERIALIZE] 🎙️ Generating audio: {:?}", dst);
        let backend = Arc::clone(&self.backend);
        let text = segment.narration.clone();
        let bytes = self
            .retry
            .run("speech", move || {
                let backend = Arc::clone(&backend);
                let text = text.clone();
                async move { backend.synthesize_speech(&text).await }
            })
            .await?;

        write_staged(dst, &bytes).await?;
        Ok(false)
    }

    async fn materialize_image(
        &self,
        segment: &Segment,
        decision: &AssetDecision,
        dst: &Path,
    ) -> Result<ImageOutcome> {
        match &decision.choice {
            AssetChoice::ReuseReal { source, date } => match copy_real(source, dst).await {
                Ok(()) => {
                    info!("[MATERIALIZE] 📷 Used real photo ({}) -> {:?}", date, dst);
                    Ok(ImageOutcome::CopiedReal)
                }
                Err(e) => {
                    warn!(
                        "[MATERIALIZE] ⚠️ {}. Falling back to AI ({}).",
                        e,
                        Theme::Photorealistic
                    );
                    self.synthesize_image(segment, Theme::Photorealistic, dst)
                        .await?;
                    Ok(ImageOutcome::Recovered)
                }
            },
            AssetChoice::SynthesizeAi { style } => {
                if self.reuse_images && larger_than(dst, MIN_CACHED_IMAGE_BYTES).await {
                    info!("[MATERIALIZE] (Image exists: {:?})", dst);
                    return Ok(ImageOutcome::Cached);
                }
                self.synthesize_image(segment, *style, dst).await?;
                Ok(ImageOutcome::Synthesized(*style))
            }
        }
    }

    async fn synthesize_image(&self, segment: &Segment, style: Theme, dst: &Path) -> Result<()> {
        let prompt = style.styled_prompt(&segment.image_prompt);
        info!("[MATERIALIZE] 🎨 AI generating {:?} ({})", dst, style);

        let backend = Arc::clone(&self.backend);
        let bytes = self
            .retry
            .run("image", move || {
                let backend = Arc::clone(&backend);
                let prompt = prompt.clone();
                async move {
                    let bytes = backend.synthesize_image(&prompt, style).await?;
                    let format = image::guess_format(&bytes)
                        .map_err(|e| anyhow::anyhow!("backend returned a non-image payload: {}", e))?;
                    tracing::debug!("[MATERIALIZE] Payload format: {:?}", format);
                    Ok(bytes)
                }
            })
            .await?;

        write_staged(dst, &bytes).await?;
        info!("[MATERIALIZE]    ✅ AI image saved.");
        Ok(())
    }
}

fn part_path(dst: &Path) -> PathBuf {
    let mut name = OsString::from(dst.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Write beside `dst` and rename into place, so an interrupted write never
/// leaves a non-empty file that later runs would treat as finished.
async fn write_staged(dst: &Path, bytes: &[u8]) -> Result<()> {
    let part = part_path(dst);
    if let Err(e) = tokio::fs::write(&part, bytes).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(ReelError::io(&part, e));
    }
    tokio::fs::rename(&part, dst)
        .await
        .map_err(|e| ReelError::io(dst, e))
}

async fn copy_real(src: &Path, dst: &Path) -> Result<()> {
    tokio::fs::copy(src, dst)
        .await
        .map(|_| ())
        .map_err(|source| ReelError::MatchFileIo {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            source,
        })
}

async fn non_empty(path: &Path) -> bool {
    larger_than(path, 0).await
}

async fn larger_than(path: &Path, min_bytes: u64) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > min_bytes,
        Err(_) => false,
    }
}
