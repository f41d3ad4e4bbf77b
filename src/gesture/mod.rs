//! Finger tracking and event synthesis.
//!
//! The hardware does no finger tracking of its own, so it all happens here:
//! raw samples are matched to fingers from the previous frame, unmatched
//! samples become new fingers, and every finger's state machine emits the
//! kernel-style events for the frame.

mod engine;
mod history;
mod matcher;
mod pool;
mod state;

pub use engine::GestureEngine;
pub use history::{CoordinateHistory, Sample};
pub use matcher::{Correspondence, CorrespondenceMatcher, MatchTable, RawSample, SampleMatch};
pub use pool::{Finger, FingerHandle, FingerPool};
pub use state::{step_finger, FingerState, StepOutcome};

use crate::error::{Error, Result};

pub const DEFAULT_COORD_BUFFER_SIZE: usize = 6;
pub const DEFAULT_MAX_FINGERS: usize = 1;

/// Tracking parameters, fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSettings {
    /// Samples kept per finger.
    pub coord_buffer_size: usize,
    /// Minimum weight for an unclaimed sample to become a finger.
    pub finger_down_weight_threshold: i32,
    /// Limit stored movement to one unit per axis per sample.
    pub position_filter_enabled: bool,
    /// Simultaneous fingers expected; the pool holds twice this many.
    pub max_fingers: usize,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            coord_buffer_size: DEFAULT_COORD_BUFFER_SIZE,
            finger_down_weight_threshold: 0,
            position_filter_enabled: false,
            max_fingers: DEFAULT_MAX_FINGERS,
        }
    }
}

impl GestureSettings {
    pub fn pool_capacity(&self) -> usize {
        self.max_fingers * 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.coord_buffer_size == 0 {
            return Err(Error::InvalidSettings(
                "coordinate buffer size must be at least 1".into(),
            ));
        }
        if self.max_fingers == 0 {
            return Err(Error::InvalidSettings("max fingers must be at least 1".into()));
        }
        if self.max_fingers > u16::MAX as usize {
            return Err(Error::InvalidSettings(format!(
                "max fingers {} is too large",
                self.max_fingers
            )));
        }
        Ok(())
    }
}
