//! Effects produced by state transitions

use crate::protocol::OutboundFrame;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a status or result frame to the client
    Notify(OutboundFrame),

    /// Run the transcription engine (blocking, dispatched off the session task)
    Transcribe { audio: Vec<u8> },

    /// Ask the reasoning adapter for a reply
    RequestReply { text: String },

    /// Run speech synthesis (blocking, dispatched off the session task)
    Synthesize { text: String },

    /// Feed `Event::Continue` back into the machine
    Continue,

    /// Log that an inbound frame was dropped
    IgnoreFrame { kind: String },
}
