//! Text-to-speech engines

use super::{check_status, lazy_client, SpeechError, Synthesizer};
use crate::config::SynthesisConfig;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Duration;

const XI_API_KEY_HEADER: &str = "xi-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs text-to-speech over HTTP
pub struct ElevenLabsSynthesizer {
    url: String,
    api_key: String,
    model_id: String,
    client: OnceLock<reqwest::blocking::Client>,
}

impl ElevenLabsSynthesizer {
    pub fn new(config: &SynthesisConfig, api_key: impl Into<String>) -> Self {
        Self {
            url: format!(
                "{}/v1/text-to-speech/{}?output_format={}",
                config.base_url.trim_end_matches('/'),
                config.voice_id,
                config.output_format
            ),
            api_key: api_key.into(),
            model_id: config.model_id.clone(),
            client: OnceLock::new(),
        }
    }
}

impl Synthesizer for ElevenLabsSynthesizer {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let client = lazy_client(&self.client, REQUEST_TIMEOUT)?;
        let response = client
            .post(&self.url)
            .header(XI_API_KEY_HEADER, &self.api_key)
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        let audio = check_status(response)?
            .bytes()
            .map_err(|e| SpeechError::Decode(e.to_string()))?;
        if audio.is_empty() {
            tracing::warn!("Synthesis returned no audio bytes");
        }
        Ok(audio.to_vec())
    }
}

/// Used when no synthesis engine is configured; always returns no audio
pub struct SilentSynthesizer;

impl Synthesizer for SilentSynthesizer {
    fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
        Ok(Vec::new())
    }
}
