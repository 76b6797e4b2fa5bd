//! Normalized reasoning output

use crate::config::AffectBounds;

/// Reply text plus the mood/alertness shift it implies
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub response_text: String,
    pub delta_valence: f64,
    pub delta_arousal: f64,
}

impl Reply {
    pub fn new(response_text: impl Into<String>, delta_valence: f64, delta_arousal: f64) -> Self {
        Self {
            response_text: response_text.into(),
            delta_valence,
            delta_arousal,
        }
    }

    /// Reply with neutral affect
    pub fn neutral(response_text: impl Into<String>) -> Self {
        Self::new(response_text, 0.0, 0.0)
    }

    /// Clamp both deltas into `[-bound, bound]`; non-finite deltas become zero
    ///
    /// A non-finite bound allows no movement at all.
    #[must_use]
    pub fn clamped(self, bounds: AffectBounds) -> Self {
        Self {
            delta_valence: clamp_delta(self.delta_valence, bounds.valence),
            delta_arousal: clamp_delta(self.delta_arousal, bounds.arousal),
            ..self
        }
    }
}

fn clamp_delta(value: f64, bound: f64) -> f64 {
    let bound = if bound.is_finite() { bound.abs() } else { 0.0 };
    if value.is_finite() {
        value.clamp(-bound, bound)
    } else {
        0.0
    }
}
