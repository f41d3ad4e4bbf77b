//! Synthesized input events, shaped like kernel `input_event` records.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use evdevil::event::{EventType, InputEvent};

use crate::input::event::{ABS_X, ABS_Y, BTN_TOUCH, EV_ABS, EV_FINGERID, EV_KEY, EV_SYN, SYN_REPORT};

/// Wall-clock time since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub fn now() -> Self {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(Self)
            .unwrap_or_default()
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Build from a `timeval` pair. Negative components clamp to zero.
    pub fn from_timeval(sec: i64, usec: i64) -> Self {
        let sec = sec.max(0) as u64;
        let usec = usec.clamp(0, 999_999) as u32;
        Self(Duration::new(sec, usec * 1000))
    }

    pub fn secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn subsec_micros(&self) -> u32 {
        self.0.subsec_micros()
    }

    pub fn as_nanos(&self) -> u128 {
        self.0.as_nanos()
    }

    pub fn offset(&self, by: Duration) -> Self {
        Self(self.0.saturating_add(by))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs(), self.subsec_micros())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FingerId,
    AxisX,
    AxisY,
    ButtonTouch,
    Sync,
}

impl EventKind {
    /// Kernel event type this kind is written as.
    pub fn raw_type(&self) -> u16 {
        match self {
            EventKind::FingerId => EV_FINGERID,
            EventKind::AxisX | EventKind::AxisY => EV_ABS,
            EventKind::ButtonTouch => EV_KEY,
            EventKind::Sync => EV_SYN,
        }
    }

    /// Event code this kind is written with.
    pub fn raw_code(&self) -> u16 {
        match self {
            EventKind::FingerId => 0,
            EventKind::AxisX => ABS_X,
            EventKind::AxisY => ABS_Y,
            EventKind::ButtonTouch => BTN_TOUCH,
            EventKind::Sync => SYN_REPORT,
        }
    }

    /// Map a raw type/code pair back to a kind. Finger ids accept any code.
    pub fn from_raw(ty: u16, code: u16) -> Option<Self> {
        match (ty, code) {
            (EV_FINGERID, _) => Some(EventKind::FingerId),
            (EV_ABS, ABS_X) => Some(EventKind::AxisX),
            (EV_ABS, ABS_Y) => Some(EventKind::AxisY),
            (EV_KEY, BTN_TOUCH) => Some(EventKind::ButtonTouch),
            (EV_SYN, SYN_REPORT) => Some(EventKind::Sync),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::FingerId => write!(f, "FingerId"),
            EventKind::AxisX => write!(f, "AxisX"),
            EventKind::AxisY => write!(f, "AxisY"),
            EventKind::ButtonTouch => write!(f, "ButtonTouch"),
            EventKind::Sync => write!(f, "Sync"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: Timestamp,
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl Event {
    pub fn new(timestamp: Timestamp, kind: EventKind, value: i32) -> Self {
        Self {
            timestamp,
            kind,
            code: kind.raw_code(),
            value,
        }
    }

    pub fn finger_id(timestamp: Timestamp, id: u32) -> Self {
        // Ids wrap into the i32 value field like the kernel's tracking ids.
        Self::new(timestamp, EventKind::FingerId, id as i32)
    }

    pub fn axis_x(timestamp: Timestamp, x: i32) -> Self {
        Self::new(timestamp, EventKind::AxisX, x)
    }

    pub fn axis_y(timestamp: Timestamp, y: i32) -> Self {
        Self::new(timestamp, EventKind::AxisY, y)
    }

    pub fn button_touch(timestamp: Timestamp, pressed: bool) -> Self {
        Self::new(timestamp, EventKind::ButtonTouch, i32::from(pressed))
    }

    pub fn sync(timestamp: Timestamp) -> Self {
        Self::new(timestamp, EventKind::Sync, 0)
    }

    pub fn to_input_event(&self) -> InputEvent {
        InputEvent::new(EventType::from_raw(self.kind.raw_type()), self.code, self.value)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Sync => write!(f, "{} Sync", self.timestamp),
            kind => write!(f, "{} {}({})", self.timestamp, kind, self.value),
        }
    }
}

/// The events synthesized for one frame, terminated by a `Sync` when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBatch {
    events: Vec<Event>,
}

impl EventBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }
}

impl<'a> IntoIterator for &'a EventBatch {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
