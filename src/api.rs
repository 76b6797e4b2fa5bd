//! HTTP and WebSocket API for the voice companion

mod handlers;
mod types;
mod ws;

pub use handlers::create_router;
pub use ws::WebSocketConnection;

use crate::session::TurnServices;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub services: TurnServices,
    /// Frames buffered per session while a turn is running
    pub inbound_queue: usize,
    pub synthesis_enabled: bool,
}

impl AppState {
    pub fn new(services: TurnServices, inbound_queue: usize, synthesis_enabled: bool) -> Self {
        Self {
            services,
            inbound_queue,
            synthesis_enabled,
        }
    }
}
