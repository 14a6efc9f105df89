#![allow(dead_code)]

use async_trait::async_trait;
use chronoreel_core::pipeline::catalog::Segment;
use chronoreel_core::pipeline::{Materializer, RetryPolicy, SynthesisBackend, Theme};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// PNG signature followed by padding; enough for `image::guess_format`.
pub fn fake_png() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(2048, 0);
    bytes
}

#[derive(Default)]
pub struct MockBackend {
    pub speech_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub image_requests: Mutex<Vec<(String, Theme)>>,
    /// Speech fails for narration containing this marker.
    pub fail_speech_marker: Option<String>,
    pub fail_images: bool,
    pub non_image_payload: bool,
}

impl MockBackend {
    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn styles(&self) -> Vec<Theme> {
        self.image_requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, style)| *style)
            .collect()
    }
}

#[async_trait]
impl SynthesisBackend for MockBackend {
    async fn synthesize_speech(&self, text: &str) -> anyhow::Result<Vec<u8>> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = &self.fail_speech_marker {
            if text.contains(marker.as_str()) {
                anyhow::bail!("voice service unavailable");
            }
        }
        Ok(format!("MP3:{}", text).into_bytes())
    }

    async fn synthesize_image(&self, prompt: &str, style: Theme) -> anyhow::Result<Vec<u8>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), style));
        if self.fail_images {
            anyhow::bail!("diffusion backend down");
        }
        if self.non_image_payload {
            return Ok(b"{\"error\": \"model loading\"}".to_vec());
        }
        Ok(fake_png())
    }
}

pub fn quick_retry() -> RetryPolicy {
    RetryPolicy::new(2, Duration::ZERO)
}

pub fn materializer(backend: &Arc<MockBackend>, output_dir: &Path) -> Materializer {
    Materializer::new(backend.clone(), output_dir, quick_retry())
}

pub fn segment(id: u32, narration: &str) -> Segment {
    Segment {
        id,
        narration: narration.to_string(),
        image_prompt: format!("scene {}", id),
    }
}
