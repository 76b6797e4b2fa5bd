//! Wire types exchanged with the client
//!
//! Inbound frames are raw audio (binary) or already-recognized text. Every
//! outbound frame is a JSON object carrying a `status` naming the turn stage.

use crate::reasoning::Reply;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;

/// A frame received from the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Raw single-channel audio, WAV-compatible encoding
    Binary(Vec<u8>),
    /// UTF-8 text treated as recognized speech
    Text(String),
    /// Any frame kind the orchestrator does not handle
    Other { kind: String },
}

impl InboundFrame {
    pub fn kind(&self) -> &str {
        match self {
            InboundFrame::Binary(_) => "binary",
            InboundFrame::Text(_) => "text",
            InboundFrame::Other { kind } => kind,
        }
    }
}

/// Marker attached to a `listening` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningInfo {
    NoSpeechDetected,
}

/// A status or result frame sent to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutboundFrame {
    Transcribing,
    LlmProcessing {
        user_text: String,
    },
    Listening {
        info: ListeningInfo,
    },
    GeneratingAudio {
        response_text: String,
    },
    /// Final result of a turn
    Speaking {
        response_text: String,
        delta_valence: f64,
        delta_arousal: f64,
        /// Base64-encoded synthesized audio, omitted when synthesis produced nothing
        #[serde(skip_serializing_if = "Option::is_none")]
        audio: Option<String>,
    },
}

impl OutboundFrame {
    pub fn no_speech() -> Self {
        OutboundFrame::Listening {
            info: ListeningInfo::NoSpeechDetected,
        }
    }

    /// Build the result frame, attaching audio only when there is some
    pub fn speaking(reply: &Reply, audio: Option<&[u8]>) -> Self {
        OutboundFrame::Speaking {
            response_text: reply.response_text.clone(),
            delta_valence: reply.delta_valence,
            delta_arousal: reply.delta_arousal,
            audio: audio.filter(|a| !a.is_empty()).map(|a| BASE64.encode(a)),
        }
    }

    /// Status name as it appears on the wire
    pub fn status(&self) -> &'static str {
        match self {
            OutboundFrame::Transcribing => "transcribing",
            OutboundFrame::LlmProcessing { .. } => "llm_processing",
            OutboundFrame::Listening { .. } => "listening",
            OutboundFrame::GeneratingAudio { .. } => "generating_audio",
            OutboundFrame::Speaking { .. } => "speaking",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
