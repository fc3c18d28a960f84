//! Direction classifier port trait.
//!
//! The engine depends only on this abstraction; concrete model integrations
//! (or deterministic stubs for testing) live in adapters. Implementations
//! must be synchronous and non-failing: any internal error degrades to
//! [`Direction::Unknown`], which callers treat as "no filter".

use crate::domain::features::FeatureWindow;
use crate::domain::signal::Direction;

pub trait PredictionPort {
    fn predict_direction(&self, window: &FeatureWindow) -> Direction;
}
