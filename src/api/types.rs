//! API response types

use serde::Serialize;

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether replies carry synthesized audio
    pub synthesis: bool,
}

impl HealthResponse {
    pub fn ok(synthesis: bool) -> Self {
        Self {
            status: "ok",
            synthesis,
        }
    }
}
