//! Deterministic classifier stand-ins.
//!
//! Model training and loading live outside this crate; these adapters cover
//! wiring and testing. `FixedPredictionAdapter` always answers with one
//! direction; `NullPredictionAdapter` represents a missing model and always
//! degrades to `Unknown`.

use crate::domain::features::FeatureWindow;
use crate::domain::signal::Direction;
use crate::ports::prediction_port::PredictionPort;
use log::debug;

pub struct FixedPredictionAdapter {
    direction: Direction,
}

impl FixedPredictionAdapter {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }
}

impl PredictionPort for FixedPredictionAdapter {
    fn predict_direction(&self, _window: &FeatureWindow) -> Direction {
        self.direction
    }
}

/// No model available; every query degrades to `Unknown` so the rule-based
/// signal passes through unfiltered.
pub struct NullPredictionAdapter;

impl PredictionPort for NullPredictionAdapter {
    fn predict_direction(&self, _window: &FeatureWindow) -> Direction {
        debug!("classifier unavailable; returning UNKNOWN");
        Direction::Unknown
    }
}
