//! Turn state types

use crate::reasoning::Reply;

/// Stage of the current turn; one per session
///
/// `AwaitingInput` is both the initial state and the state every completed or
/// aborted turn returns to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TurnState {
    #[default]
    AwaitingInput,
    /// Audio handed to the transcription engine
    Transcribing { audio_bytes: usize },
    /// Text is available, from transcription or directly from the client
    Recognized { text: String },
    /// Waiting for the reasoning adapter
    Reasoning { user_text: String },
    /// Reply known, audio being synthesized
    AudioGenerating { reply: Reply },
    /// Everything produced; the result frame goes out on leaving this stage
    Speaking { reply: Reply, audio: Option<Vec<u8>> },
}

impl TurnState {
    pub fn name(&self) -> &'static str {
        match self {
            TurnState::AwaitingInput => "awaiting_input",
            TurnState::Transcribing { .. } => "transcribing",
            TurnState::Recognized { .. } => "recognized",
            TurnState::Reasoning { .. } => "reasoning",
            TurnState::AudioGenerating { .. } => "audio_generating",
            TurnState::Speaking { .. } => "speaking",
        }
    }
}
