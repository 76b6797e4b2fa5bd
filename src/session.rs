//! Per-connection session loop
//!
//! One [`SessionRuntime`] drives one client connection: frames come in, the
//! turn state machine decides what happens, and effects are executed against
//! the injected collaborators.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::dispatch::BlockingDispatcher;
use crate::reasoning::Reasoner;
use crate::speech::{Synthesizer, Transcriber};
use crate::state_machine::TransitionError;
use std::sync::Arc;
use thiserror::Error;

/// Collaborators shared by every session in the process
#[derive(Clone)]
pub struct TurnServices {
    pub transcriber: Arc<dyn Transcriber>,
    pub synthesizer: Arc<dyn Synthesizer>,
    pub reasoner: Arc<dyn Reasoner>,
    pub dispatcher: BlockingDispatcher,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The client is gone; the session ends
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// The current turn is abandoned; the session continues
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
