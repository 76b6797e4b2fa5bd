//! Pure state transition function

use super::{Effect, Event, TurnState};
use crate::protocol::OutboundFrame;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TurnState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TurnState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A turn is already in progress ({0})")]
    TurnInProgress(&'static str),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(state: &TurnState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Frames that carry no turn input
        // ============================================================
        (_, Event::UnsupportedFrame { kind }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::IgnoreFrame { kind }))
        }

        (_, Event::Abort) => Ok(TransitionResult::new(TurnState::AwaitingInput)),

        // ============================================================
        // Turn start
        // ============================================================
        (TurnState::AwaitingInput, Event::AudioReceived { audio }) => {
            Ok(TransitionResult::new(TurnState::Transcribing {
                audio_bytes: audio.len(),
            })
            .with_effect(Effect::Notify(OutboundFrame::Transcribing))
            .with_effect(Effect::Transcribe { audio }))
        }

        (TurnState::AwaitingInput, Event::TextReceived { text }) => {
            Ok(TransitionResult::new(TurnState::Recognized { text }).with_effect(Effect::Continue))
        }

        (busy, Event::AudioReceived { .. } | Event::TextReceived { .. }) => {
            Err(TransitionError::TurnInProgress(busy.name()))
        }

        // ============================================================
        // Transcription
        // ============================================================
        (TurnState::Transcribing { .. }, Event::Transcribed { text }) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(TransitionResult::new(TurnState::AwaitingInput)
                    .with_effect(Effect::Notify(OutboundFrame::no_speech())))
            } else {
                Ok(TransitionResult::new(TurnState::Recognized {
                    text: text.to_string(),
                })
                .with_effect(Effect::Continue))
            }
        }

        (TurnState::Transcribing { .. }, Event::TranscriptionFailed) => {
            Ok(TransitionResult::new(TurnState::AwaitingInput)
                .with_effect(Effect::Notify(OutboundFrame::no_speech())))
        }

        // ============================================================
        // Reasoning and synthesis
        // ============================================================
        (TurnState::Recognized { text }, Event::Continue) => {
            Ok(TransitionResult::new(TurnState::Reasoning {
                user_text: text.clone(),
            })
            .with_effect(Effect::Notify(OutboundFrame::LlmProcessing {
                user_text: text.clone(),
            }))
            .with_effect(Effect::RequestReply { text: text.clone() }))
        }

        (TurnState::Reasoning { .. }, Event::ReplyReady { reply }) => {
            let text = reply.response_text.clone();
            Ok(TransitionResult::new(TurnState::AudioGenerating { reply })
                .with_effect(Effect::Notify(OutboundFrame::GeneratingAudio {
                    response_text: text.clone(),
                }))
                .with_effect(Effect::Synthesize { text }))
        }

        (TurnState::AudioGenerating { reply }, Event::AudioReady { audio }) => {
            Ok(TransitionResult::new(TurnState::Speaking {
                reply: reply.clone(),
                audio: audio.filter(|a| !a.is_empty()),
            })
            .with_effect(Effect::Continue))
        }

        (TurnState::Speaking { reply, audio }, Event::Continue) => {
            Ok(TransitionResult::new(TurnState::AwaitingInput)
                .with_effect(Effect::Notify(OutboundFrame::speaking(reply, audio.as_deref()))))
        }

        // ============================================================
        // Invalid transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} on {}",
            state.name(),
            event_name(&event)
        ))),
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::AudioReceived { .. } => "audio_received",
        Event::TextReceived { .. } => "text_received",
        Event::UnsupportedFrame { .. } => "unsupported_frame",
        Event::Transcribed { .. } => "transcribed",
        Event::TranscriptionFailed => "transcription_failed",
        Event::ReplyReady { .. } => "reply_ready",
        Event::AudioReady { .. } => "audio_ready",
        Event::Continue => "continue",
        Event::Abort => "abort",
    }
}
