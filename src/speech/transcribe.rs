//! OpenAI-compatible transcription endpoint

use super::{check_status, lazy_client, SpeechError, Transcriber};
use crate::config::TranscriptionConfig;
use reqwest::blocking::multipart::{Form, Part};
use std::sync::OnceLock;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Uploads audio to `{base_url}/audio/transcriptions` and reads back `text`
pub struct HttpTranscriber {
    url: String,
    api_key: Option<String>,
    model: String,
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpTranscriber {
    pub fn new(config: &TranscriptionConfig) -> Self {
        Self {
            url: format!(
                "{}/audio/transcriptions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client: OnceLock::new(),
        }
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Ok(String::new());
        }

        let client = lazy_client(&self.client, REQUEST_TIMEOUT)?;
        let part = Part::bytes(audio.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::Request(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let mut request = client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| SpeechError::Request(e.to_string()))?;
        let body: serde_json::Value = check_status(response)?
            .json()
            .map_err(|e| SpeechError::Decode(e.to_string()))?;

        let text = body
            .get("text")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| SpeechError::Decode("response has no 'text' field".to_string()))?;
        Ok(text.trim().to_string())
    }
}
