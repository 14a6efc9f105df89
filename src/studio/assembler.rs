// CHRONOREEL Video Assembler
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Each (audio, image) pair becomes a still clip that lasts as long as its
// narration. Clips are then joined with FFmpeg's concat demuxer (`-c copy`),
// which is lossless because every clip shares the same encoder settings.

use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::error::{ReelError, Result};
use crate::pipeline::catalog::Segment;
use crate::pipeline::materializer::{audio_path, image_path};

pub const FPS: u32 = 24;

/// A segment ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSource {
    pub segment_id: u32,
    pub audio: PathBuf,
    pub image: PathBuf,
}

/// Pairs present on disk, in plan order. Incomplete segments are skipped.
pub fn collect_clip_sources(segments: &[Segment], assets_dir: &Path) -> Vec<ClipSource> {
    segments
        .iter()
        .filter_map(|segment| {
            let audio = audio_path(assets_dir, segment.id);
            let image = image_path(assets_dir, segment.id);
            if audio.is_file() && image.is_file() {
                Some(ClipSource {
                    segment_id: segment.id,
                    audio,
                    image,
                })
            } else {
                warn!(
                    "[ASSEMBLE] Skipping segment {}: missing audio or image files.",
                    segment.id
                );
                None
            }
        })
        .collect()
}

/// `file '<path>'` per line, as the concat demuxer expects.
pub fn create_concat_manifest(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|p| format!("file '{}'", p.to_string_lossy().replace('\'', "'\\''")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn probe_duration(path: &Path) -> Result<f64> {
    let output = tokio::time::timeout(
        tokio::time::Duration::from_secs(10),
        Command::new("ffprobe")
            .kill_on_drop(true)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output(),
    )
    .await
    .map_err(|_| ReelError::Assembly(format!("ffprobe timed out on {:?}", path)))?
    .map_err(|e| ReelError::io(path, e))?;

    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .map_err(|_| ReelError::Assembly(format!("could not read duration of {:?}", path)))
}

pub struct VideoAssembler {
    work_dir: PathBuf,
}

impl VideoAssembler {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
        }
    }

    async fn render_still(&self, source: &ClipSource) -> Result<PathBuf> {
        let duration = probe_duration(&source.audio).await?;
        let clip = self.work_dir.join(format!("clip_{:03}.mp4", source.segment_id));
        info!(
            "[ASSEMBLE] Segment {}: {:.2}s still clip",
            source.segment_id, duration
        );

        let status = Command::new("ffmpeg")
            .args(["-y", "-nostdin", "-loop", "1", "-i"])
            .arg(&source.image)
            .arg("-i")
            .arg(&source.audio)
            .args(["-t", &format!("{:.3}", duration)])
            .args([
                "-r",
                &FPS.to_string(),
                "-vf",
                "scale=trunc(iw/2)*2:trunc(ih/2)*2",
                "-c:v",
                "libx264",
                "-tune",
                "stillimage",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-b:a",
                "192k",
                "-shortest",
            ])
            .arg(&clip)
            .status()
            .await
            .map_err(|e| ReelError::io(&clip, e))?;

        if !status.success() {
            return Err(ReelError::Assembly(format!(
                "ffmpeg failed rendering segment {}",
                source.segment_id
            )));
        }
        Ok(clip)
    }

    pub async fn assemble(&self, segments: &[Segment], assets_dir: &Path, output: &Path) -> Result<PathBuf> {
        let sources = collect_clip_sources(segments, assets_dir);
        if sources.is_empty() {
            return Err(ReelError::Assembly(
                "no clips were created; check the assets folder".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|e| ReelError::io(&self.work_dir, e))?;

        let mut clips = Vec::with_capacity(sources.len());
        for source in &sources {
            clips.push(self.render_still(source).await?);
        }

        let manifest_path = self.work_dir.join("concat_manifest.txt");
        tokio::fs::write(&manifest_path, create_concat_manifest(&clips))
            .await
            .map_err(|e| ReelError::io(&manifest_path, e))?;
        info!(
            "[ASSEMBLE] Manifest written ({} clips): {:?}",
            clips.len(),
            manifest_path
        );

        let status = Command::new("ffmpeg")
            .args(["-y", "-nostdin", "-f", "concat", "-safe", "0", "-i"])
            .arg(&manifest_path)
            .args(["-c", "copy"])
            .arg(output)
            .status()
            .await
            .map_err(|e| ReelError::io(output, e))?;

        if let Err(e) = tokio::fs::remove_dir_all(&self.work_dir).await {
            warn!("[ASSEMBLE] Cleanup warning: {}", e);
        }

        if status.success() {
            info!("[ASSEMBLE] ✅ Final output: {:?}", output);
            Ok(output.to_path_buf())
        } else {
            error!("[ASSEMBLE] ❌ FFmpeg concat failed.");
            Err(ReelError::Assembly("ffmpeg concat demuxer failed".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_manifest_generation() {
        let clips = vec![
            PathBuf::from("/tmp/clip_001.mp4"),
            PathBuf::from("/tmp/clip_002.mp4"),
        ];
        let manifest = create_concat_manifest(&clips);
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines, vec!["file '/tmp/clip_001.mp4'", "file '/tmp/clip_002.mp4'"]);
    }

    #[test]
    fn test_manifest_escapes_quotes() {
        let manifest = create_concat_manifest(&[PathBuf::from("/tmp/it's.mp4")]);
        assert_eq!(manifest, "file '/tmp/it'\\''s.mp4'");
    }

    #[test]
    fn test_collect_skips_incomplete_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let seg = |id: u32| Segment {
            id,
            narration: String::new(),
            image_prompt: String::new(),
        };
        std::fs::write(audio_path(dir.path(), 1), b"a").unwrap();
        std::fs::write(image_path(dir.path(), 1), b"i").unwrap();
        std::fs::write(audio_path(dir.path(), 2), b"a").unwrap();

        let sources = collect_clip_sources(&[seg(1), seg(2)], dir.path());
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].segment_id, 1);
    }

    #[tokio::test]
    async fn test_assemble_without_clips_errors() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = VideoAssembler::new(&dir.path().join("work"));
        let err = assembler
            .assemble(&[], dir.path(), &dir.path().join("out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReelError::Assembly(_)));
    }
}
