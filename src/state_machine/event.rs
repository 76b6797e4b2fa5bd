//! Events that drive a turn forward

use crate::reasoning::Reply;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Client events
    AudioReceived { audio: Vec<u8> },
    TextReceived { text: String },
    UnsupportedFrame { kind: String },

    // Collaborator events
    Transcribed { text: String },
    /// The engine errored or never returned; the executor logs why
    TranscriptionFailed,
    ReplyReady { reply: Reply },
    /// Synthesis finished; `None` when it failed or produced nothing
    AudioReady { audio: Option<Vec<u8>> },

    /// Advance out of a transient stage
    Continue,

    /// Internal failure during a stage; drops the turn silently
    Abort,
}
