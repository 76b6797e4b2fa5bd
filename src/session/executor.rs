//! Session runtime executor

use super::traits::Connection;
use super::{SessionError, TurnServices};
use crate::protocol::InboundFrame;
use crate::state_machine::{transition, Effect, Event, TurnState};
use futures::FutureExt;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;

/// Drives one client connection until it disconnects
pub struct SessionRuntime<C: Connection> {
    session_id: String,
    connection: C,
    services: TurnServices,
    state: TurnState,
}

impl<C: Connection> SessionRuntime<C> {
    /// `session_id` tags every log line of this session
    pub fn new(session_id: String, connection: C, services: TurnServices) -> Self {
        Self {
            session_id,
            connection,
            services,
            state: TurnState::default(),
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Session started");

        while let Some(frame) = self.connection.recv().await {
            let event = frame_event(frame);
            let outcome = AssertUnwindSafe(self.process_event(event))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(SessionError::Connection(e))) => {
                    tracing::info!(session_id = %self.session_id, error = %e, "Connection lost mid-turn");
                    break;
                }
                Ok(Err(SessionError::Transition(e))) => {
                    tracing::warn!(session_id = %self.session_id, error = %e, "Turn abandoned");
                }
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    tracing::error!(session_id = %self.session_id, reason = %reason, "Turn panicked; returning to listening");
                    self.abort();
                }
            }
        }

        tracing::info!(session_id = %self.session_id, "Session ended");
    }

    /// Apply `event` and every event its effects produce, in order
    async fn process_event(&mut self, event: Event) -> Result<(), SessionError> {
        let mut events_to_process = VecDeque::from([event]);

        while let Some(current_event) = events_to_process.pop_front() {
            let result = match transition(&self.state, current_event) {
                Ok(r) => r,
                Err(e) => {
                    self.abort();
                    return Err(e.into());
                }
            };

            let old_state = std::mem::replace(&mut self.state, result.new_state);
            if old_state.name() != self.state.name() {
                tracing::debug!(
                    session_id = %self.session_id,
                    from = old_state.name(),
                    to = self.state.name(),
                    "Turn state changed"
                );
            }

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await? {
                    events_to_process.push_back(generated_event);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(&mut self, effect: Effect) -> Result<Option<Event>, SessionError> {
        match effect {
            Effect::Notify(frame) => {
                tracing::debug!(session_id = %self.session_id, status = frame.status(), "Sending frame");
                self.connection.send(&frame).await?;
                Ok(None)
            }

            Effect::Transcribe { audio } => {
                let transcriber = self.services.transcriber.clone();
                let result = self
                    .services
                    .dispatcher
                    .run("transcribe", move || transcriber.transcribe(&audio))
                    .await;

                Ok(Some(match result {
                    Ok(Ok(text)) => {
                        if let TurnState::Transcribing { audio_bytes } = &self.state {
                            tracing::debug!(session_id = %self.session_id, audio_bytes, chars = text.chars().count(), "Transcription finished");
                        }
                        Event::Transcribed { text }
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(session_id = %self.session_id, error = %e, "Transcription failed");
                        Event::TranscriptionFailed
                    }
                    Err(e) => {
                        tracing::error!(session_id = %self.session_id, error = %e, "Transcription did not complete");
                        Event::TranscriptionFailed
                    }
                }))
            }

            Effect::RequestReply { text } => {
                let reply = self.services.reasoner.converse(&text).await;
                Ok(Some(Event::ReplyReady { reply }))
            }

            Effect::Synthesize { text } => {
                let synthesizer = self.services.synthesizer.clone();
                let result = self
                    .services
                    .dispatcher
                    .run("synthesize", move || synthesizer.synthesize(&text))
                    .await;

                let audio = match result {
                    Ok(Ok(audio)) => Some(audio),
                    Ok(Err(e)) => {
                        tracing::warn!(session_id = %self.session_id, error = %e, "Synthesis failed; replying without audio");
                        None
                    }
                    Err(e) => {
                        tracing::error!(session_id = %self.session_id, error = %e, "Synthesis did not complete; replying without audio");
                        None
                    }
                };
                Ok(Some(Event::AudioReady { audio }))
            }

            Effect::Continue => Ok(Some(Event::Continue)),

            Effect::IgnoreFrame { kind } => {
                tracing::debug!(session_id = %self.session_id, kind = %kind, "Ignoring frame");
                Ok(None)
            }
        }
    }

    /// Drop the current turn without telling the client
    fn abort(&mut self) {
        self.state = transition(&self.state, Event::Abort)
            .map_or(TurnState::AwaitingInput, |r| r.new_state);
    }
}

fn frame_event(frame: InboundFrame) -> Event {
    match frame {
        InboundFrame::Binary(audio) => Event::AudioReceived { audio },
        InboundFrame::Text(text) => Event::TextReceived { text },
        InboundFrame::Other { kind } => Event::UnsupportedFrame { kind },
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
