//! Fold a synthesized event stream back into per-frame touch reports, the
//! way a consumer of the stream sees it.

use evdevil::event::InputEvent;

use crate::event::{Event, EventKind, Timestamp};
use crate::input::event::{ABS_X, ABS_Y, BTN_TOUCH, EV_ABS, EV_FINGERID, EV_KEY, EV_SYN};

/// Items a single report can carry before it is split.
pub const MAX_TOUCH_ITEMS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchState {
    /// Moved, still in contact.
    #[default]
    Undefined,
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchItem {
    /// `id * 1000 + code` of the `FingerId` event.
    pub finger: i64,
    pub state: TouchState,
    pub x: i32,
    pub y: i32,
    pub timestamp_ns: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchReport {
    pub items: Vec<TouchItem>,
}

#[derive(Debug, Default)]
pub struct ReportAssembler {
    current: Option<TouchReport>,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event; returns a report when one is complete.
    pub fn push(&mut self, event: &Event) -> Option<TouchReport> {
        match event.kind {
            EventKind::FingerId => self.start_item(event.timestamp, event.code, event.value),
            EventKind::AxisX => {
                if let Some(item) = self.current_item() {
                    item.x = event.value;
                }
                None
            }
            EventKind::AxisY => {
                if let Some(item) = self.current_item() {
                    item.y = event.value;
                }
                None
            }
            EventKind::ButtonTouch => {
                if let Some(item) = self.current_item() {
                    item.state = if event.value == 1 {
                        TouchState::Down
                    } else {
                        TouchState::Up
                    };
                }
                None
            }
            EventKind::Sync => self.current.take(),
        }
    }

    /// Feed a raw record, e.g. one read back from a synthesized stream.
    pub fn push_raw(&mut self, time: Timestamp, event: &InputEvent) -> Option<TouchReport> {
        let ty = event.event_type().raw();
        let code = event.raw_code();
        let value = event.raw_value();

        match ty {
            // Only SYN_REPORT closes a report; SYN_DROPPED and other sync codes are skipped.
            EV_FINGERID | EV_SYN | EV_KEY => {
                let kind = EventKind::from_raw(ty, code)?;
                self.push(&Event {
                    timestamp: time,
                    kind,
                    code,
                    value,
                })
            }
            EV_ABS => {
                if code != ABS_X && code != ABS_Y {
                    log::error!("Unexpected code {:#x}", code);
                    return None;
                }
                let kind = if code == ABS_X {
                    EventKind::AxisX
                } else {
                    EventKind::AxisY
                };
                self.push(&Event::new(time, kind, value))
            }
            _ => {
                log::warn!("Invalid event type ({:#x})", ty);
                None
            }
        }
    }

    /// Feed a whole batch, collecting every report it completes.
    pub fn push_batch<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> Vec<TouchReport> {
        events.into_iter().filter_map(|e| self.push(e)).collect()
    }

    fn start_item(&mut self, timestamp: Timestamp, code: u16, id: i32) -> Option<TouchReport> {
        let mut completed = None;
        if self
            .current
            .as_ref()
            .is_some_and(|r| r.items.len() >= MAX_TOUCH_ITEMS)
        {
            completed = self.current.take();
        }

        let report = self.current.get_or_insert_with(TouchReport::default);
        report.items.push(TouchItem {
            finger: i64::from(id) * 1000 + i64::from(code),
            state: TouchState::Undefined,
            x: 0,
            y: 0,
            timestamp_ns: timestamp.as_nanos(),
        });

        completed
    }

    fn current_item(&mut self) -> Option<&mut TouchItem> {
        let item = self.current.as_mut().and_then(|r| r.items.last_mut());
        if item.is_none() {
            log::error!("No touch item available for event");
        }
        item
    }
}
