//! Per-frame driver: pull raw input when the source is ready, decode a frame,
//! run the gesture engine, hand back the events.

use crate::error::Result;
use crate::event::{EventBatch, Timestamp};
use crate::gesture::{GestureEngine, RawSample};
use crate::input::{SampleSource, Scaling, SingleTouchDecoder};

/// 4096 bytes of 16-byte records.
pub const DEFAULT_MAX_EVENTS_PER_CALL: usize = 256;

pub struct FrameDriver<S: SampleSource> {
    source: S,
    decoder: SingleTouchDecoder,
    engine: GestureEngine,
    max_events_per_call: usize,
    frame_count: u64,
}

impl<S: SampleSource> FrameDriver<S> {
    pub fn new(source: S, engine: GestureEngine, scaling: Scaling, max_events_per_call: usize) -> Self {
        Self {
            source,
            decoder: SingleTouchDecoder::new(scaling),
            engine,
            max_events_per_call: max_events_per_call.max(1),
            frame_count: 0,
        }
    }

    /// Do at most one frame of work without blocking.
    ///
    /// Reads raw records while the source is ready, up to the per-call limit,
    /// and stops at the first completed frame. A frame left incomplete stays
    /// in the decoder and is finished by a later call.
    pub fn process_ready(&mut self, now: Timestamp) -> Result<Option<EventBatch>> {
        for _ in 0..self.max_events_per_call {
            if !self.source.is_ready()? {
                break;
            }
            let Some(event) = self.source.read_event()? else {
                continue;
            };
            if let Some(mut samples) = self.decoder.feed(&event) {
                let batch = self.run_frame(&mut samples, now);
                return Ok((!batch.is_empty()).then_some(batch));
            }
        }
        Ok(None)
    }

    /// Run a frame the caller already holds, bypassing the decoder and scaling.
    pub fn process_frame(&mut self, samples: &[RawSample], now: Timestamp) -> EventBatch {
        let mut samples = samples.to_vec();
        self.run_frame(&mut samples, now)
    }

    /// Release all fingers and reset id assignment.
    pub fn teardown(&mut self) {
        self.engine.teardown();
        self.frame_count = 0;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn run_frame(&mut self, samples: &mut [RawSample], now: Timestamp) -> EventBatch {
        let batch = self.engine.process_frame(samples, now);

        if self.frame_count == 0 {
            log::info!("Touch frames flowing");
        }
        self.frame_count += 1;
        if self.frame_count.is_multiple_of(500) {
            log::debug!(
                "Touch frames: {}, active fingers: {}",
                self.frame_count,
                self.engine.active_fingers()
            );
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    use evdevil::event::{EventType, InputEvent};

    use crate::event::EventKind;
    use crate::gesture::GestureSettings;
    use crate::input::event::{ABS_X, ABS_Y, BTN_TOUCH, EV_ABS, EV_KEY, EV_SYN, SYN_REPORT};

    /// In-memory source; `None` entries stand for malformed records.
    struct FakeSource {
        events: VecDeque<Option<(u16, u16, i32)>>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                events: VecDeque::new(),
            }
        }

        fn push(&mut self, ty: u16, code: u16, value: i32) {
            self.events.push_back(Some((ty, code, value)));
        }

        fn push_touch(&mut self, x: i32, y: i32) {
            self.push(EV_ABS, ABS_X, x);
            self.push(EV_ABS, ABS_Y, y);
        }
    }

    impl SampleSource for FakeSource {
        fn is_ready(&mut self) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read_event(&mut self) -> io::Result<Option<InputEvent>> {
            match self.events.pop_front() {
                Some(Some((ty, code, value))) => {
                    Ok(Some(InputEvent::new(EventType::from_raw(ty), code, value)))
                }
                Some(None) => Ok(None),
                None => Err(io::ErrorKind::WouldBlock.into()),
            }
        }
    }

    fn driver(source: FakeSource, max_events: usize) -> FrameDriver<FakeSource> {
        let engine = GestureEngine::new(GestureSettings::default()).unwrap();
        FrameDriver::new(source, engine, Scaling::new(1024, 768, 2048, 1536).unwrap(), max_events)
    }

    fn shape(batch: &EventBatch) -> Vec<(EventKind, i32)> {
        batch.iter().map(|e| (e.kind, e.value)).collect()
    }

    #[test]
    fn test_tap_produces_press_and_release() {
        let mut source = FakeSource::new();
        source.push_touch(400, 300);
        source.push(EV_KEY, BTN_TOUCH, 1);
        source.push(EV_SYN, SYN_REPORT, 0);
        source.push(EV_KEY, BTN_TOUCH, 0);
        source.push(EV_SYN, SYN_REPORT, 0);
        let mut driver = driver(source, 64);
        let now = Timestamp::from_millis(10);

        let batch = driver.process_ready(now).unwrap().unwrap();
        assert_eq!(
            shape(&batch),
            vec![
                (EventKind::FingerId, 0),
                (EventKind::ButtonTouch, 1),
                (EventKind::AxisX, 200),
                (EventKind::AxisY, 150),
                (EventKind::Sync, 0),
            ]
        );

        // BTN_TOUCH 0 reports the lift-off position while the finger is still down.
        let batch = driver.process_ready(now).unwrap().unwrap();
        assert_eq!(
            shape(&batch),
            vec![
                (EventKind::FingerId, 0),
                (EventKind::AxisX, 200),
                (EventKind::AxisY, 150),
                (EventKind::Sync, 0),
            ]
        );

        let batch = driver.process_ready(now).unwrap().unwrap();
        assert_eq!(
            shape(&batch),
            vec![
                (EventKind::FingerId, 0),
                (EventKind::AxisX, 200),
                (EventKind::AxisY, 150),
                (EventKind::ButtonTouch, 0),
                (EventKind::Sync, 0),
            ]
        );

        assert!(driver.process_ready(now).unwrap().is_none());
        assert_eq!(driver.frame_count(), 3);
        assert_eq!(driver.engine().active_fingers(), 0);
    }

    #[test]
    fn test_partial_frame_resumes_next_call() {
        let mut source = FakeSource::new();
        source.push_touch(100, 100);
        source.push(EV_KEY, BTN_TOUCH, 1);
        source.push(EV_SYN, SYN_REPORT, 0);
        let mut driver = driver(source, 2);
        let now = Timestamp::default();

        assert!(driver.process_ready(now).unwrap().is_none());
        assert_eq!(driver.frame_count(), 0);

        let batch = driver.process_ready(now).unwrap().unwrap();
        assert_eq!(batch.len(), 5);
        assert_eq!(driver.engine().active_fingers(), 1);
    }

    #[test]
    fn test_malformed_records_skipped() {
        let mut source = FakeSource::new();
        source.push_touch(100, 100);
        source.events.push_back(None);
        source.push(EV_KEY, BTN_TOUCH, 1);
        source.push(0x04, 0x04, 99);
        source.push(EV_SYN, SYN_REPORT, 0);
        let mut driver = driver(source, 64);

        let batch = driver.process_ready(Timestamp::default()).unwrap().unwrap();
        assert_eq!(batch.as_slice()[2].value, 50);
    }

    #[test]
    fn test_idle_sync_yields_nothing() {
        let mut source = FakeSource::new();
        source.push(EV_SYN, SYN_REPORT, 0);
        let mut driver = driver(source, 64);

        assert!(driver.process_ready(Timestamp::default()).unwrap().is_none());
        assert_eq!(driver.frame_count(), 1);
    }

    #[test]
    fn test_process_frame_and_teardown() {
        let mut driver = driver(FakeSource::new(), 64);
        let batch = driver.process_frame(&[RawSample::new(10, 20, 5)], Timestamp::default());
        assert_eq!(batch.len(), 5);
        assert_eq!(driver.engine().active_fingers(), 1);

        driver.teardown();
        assert_eq!(driver.engine().active_fingers(), 0);
        assert_eq!(driver.frame_count(), 0);
    }
}
