//! One frame of finger tracking: match, spawn, step, sync.

use super::matcher::{CorrespondenceMatcher, RawSample};
use super::pool::FingerPool;
use super::state::{step_finger, StepOutcome};
use super::GestureSettings;
use crate::error::Result;
use crate::event::{Event, EventBatch, Timestamp};

pub struct GestureEngine {
    pool: FingerPool,
    matcher: CorrespondenceMatcher,
    next_id: u32,
}

impl GestureEngine {
    pub fn new(settings: GestureSettings) -> Result<Self> {
        settings.validate()?;
        let pool = FingerPool::new(&settings)?;

        log::debug!(
            "Gesture engine ready ({} finger slots, history {}, filter {})",
            pool.capacity(),
            settings.coord_buffer_size,
            settings.position_filter_enabled
        );

        Ok(Self {
            pool,
            matcher: CorrespondenceMatcher::new(settings.finger_down_weight_threshold),
            next_id: 0,
        })
    }

    /// Track one frame of samples and synthesize its events. The samples are
    /// consumed in place. An empty batch means nothing is touching.
    pub fn process_frame(&mut self, samples: &mut [RawSample], timestamp: Timestamp) -> EventBatch {
        let table = self
            .matcher
            .correlate(&mut self.pool, samples, timestamp, &mut self.next_id);

        // Up to four events per finger, plus the trailing sync.
        let mut events = EventBatch::with_capacity(4 * self.pool.capacity() + 1);

        for handle in self.pool.active_handles() {
            let matched = table.is_matched(handle);
            let Some(finger) = self.pool.get_mut(handle) else {
                continue;
            };
            if step_finger(finger, matched, &mut events) == StepOutcome::Release {
                self.pool.release(handle);
            }
        }

        if !events.is_empty() {
            events.push(Event::sync(timestamp));
        }
        events
    }

    /// Release every finger and restart id assignment.
    pub fn teardown(&mut self) {
        self.pool.clear();
        self.next_id = 0;
    }

    pub fn active_fingers(&self) -> usize {
        self.pool.active_len()
    }

    pub fn pool(&self) -> &FingerPool {
        &self.pool
    }
}
