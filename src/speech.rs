//! Speech collaborators: transcription and synthesis engines
//!
//! Both engines are blocking. The session runtime calls them through the
//! [`BlockingDispatcher`](crate::dispatch::BlockingDispatcher), never directly
//! from async code.

mod silence;
mod synthesize;
mod transcribe;

pub use silence::SilenceGate;
pub use synthesize::{ElevenLabsSynthesizer, SilentSynthesizer};
pub use transcribe::HttpTranscriber;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Engine returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Could not decode engine response: {0}")]
    Decode(String),
    #[error("Could not build HTTP client: {0}")]
    Client(String),
}

/// Audio bytes to text; an empty string means nothing was said
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &[u8]) -> Result<String, SpeechError>;
}

/// Text to audio bytes; an empty buffer means no audio
pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Build a blocking HTTP client on first use
///
/// Blocking clients own a runtime of their own, so they are created from the
/// blocking pool rather than while the server starts.
fn lazy_client(
    cell: &std::sync::OnceLock<reqwest::blocking::Client>,
    timeout: std::time::Duration,
) -> Result<&reqwest::blocking::Client, SpeechError> {
    if let Some(client) = cell.get() {
        return Ok(client);
    }
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SpeechError::Client(e.to_string()))?;
    Ok(cell.get_or_init(|| client))
}

/// Map a non-success response to [`SpeechError::Http`]
fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, SpeechError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(SpeechError::Http {
        status: status.as_u16(),
        body,
    })
}
