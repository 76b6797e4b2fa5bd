//! Turn state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: the
//! session loop feeds events in, executes the returned effects, and feeds the
//! events those effects produce back in.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::TurnState;
pub use transition::{transition, TransitionError, TransitionResult};
