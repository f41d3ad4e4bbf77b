//! Per-finger lifecycle: Start -> Down -> Unused.
//!
//! Each step emits `FingerId`, an optional `ButtonTouch(1)` on the first
//! step, `AxisX`, `AxisY` and, when the finger lost its sample this frame,
//! a closing `ButtonTouch(0)`.

use super::pool::Finger;
use crate::event::{Event, EventBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerState {
    /// Spawned this frame, touch not yet reported.
    Start,
    /// Touch reported, finger still in contact.
    Down,
    /// Sitting in the available pool.
    Unused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Keep,
    /// The finger emitted its release and must go back to the pool.
    Release,
}

/// Advance one finger by a frame, appending its events to `events`.
pub fn step_finger(finger: &mut Finger, matched: bool, events: &mut EventBatch) -> StepOutcome {
    if finger.state == FingerState::Unused {
        log::error!("Finger {} stepped after release", finger.id);
        return StepOutcome::Release;
    }

    let Some(last) = finger.history.last() else {
        log::error!("Finger {} has no coordinates, dropping it", finger.id);
        finger.state = FingerState::Unused;
        return StepOutcome::Release;
    };
    let ts = last.timestamp;

    events.push(Event::finger_id(ts, finger.id));
    if finger.state == FingerState::Start {
        finger.state = FingerState::Down;
        events.push(Event::button_touch(ts, true));
    }
    events.push(Event::axis_x(ts, last.x));
    events.push(Event::axis_y(ts, last.y));

    if matched {
        return StepOutcome::Keep;
    }

    log::info!("Finger up at {},{}", last.x, last.y);
    events.push(Event::button_touch(ts, false));
    finger.state = FingerState::Unused;
    StepOutcome::Release
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, Timestamp};
    use crate::gesture::history::CoordinateHistory;

    fn finger_at(x: i32, y: i32) -> Finger {
        let mut history = CoordinateHistory::new(6, false).unwrap();
        history.push(x, y, Timestamp::from_millis(40));
        Finger {
            id: 7,
            history,
            state: FingerState::Start,
            last_weight: 10,
        }
    }

    fn shape(events: &EventBatch) -> Vec<(EventKind, i32)> {
        events.iter().map(|e| (e.kind, e.value)).collect()
    }

    #[test]
    fn test_start_emits_press() {
        let mut finger = finger_at(3, 4);
        let mut events = EventBatch::default();
        assert_eq!(step_finger(&mut finger, true, &mut events), StepOutcome::Keep);
        assert_eq!(
            shape(&events),
            vec![
                (EventKind::FingerId, 7),
                (EventKind::ButtonTouch, 1),
                (EventKind::AxisX, 3),
                (EventKind::AxisY, 4),
            ]
        );
        assert_eq!(finger.state, FingerState::Down);
        assert!(events.iter().all(|e| e.timestamp == Timestamp::from_millis(40)));
    }

    #[test]
    fn test_down_matched_has_no_press() {
        let mut finger = finger_at(3, 4);
        finger.state = FingerState::Down;
        let mut events = EventBatch::default();
        step_finger(&mut finger, true, &mut events);
        assert_eq!(
            shape(&events),
            vec![(EventKind::FingerId, 7), (EventKind::AxisX, 3), (EventKind::AxisY, 4)]
        );
    }

    #[test]
    fn test_unmatched_releases() {
        let mut finger = finger_at(3, 4);
        finger.state = FingerState::Down;
        let mut events = EventBatch::default();
        assert_eq!(step_finger(&mut finger, false, &mut events), StepOutcome::Release);
        assert_eq!(
            shape(&events),
            vec![
                (EventKind::FingerId, 7),
                (EventKind::AxisX, 3),
                (EventKind::AxisY, 4),
                (EventKind::ButtonTouch, 0),
            ]
        );
        assert_eq!(finger.state, FingerState::Unused);

        let mut again = EventBatch::default();
        assert_eq!(step_finger(&mut finger, false, &mut again), StepOutcome::Release);
        assert!(again.is_empty());
    }
}
