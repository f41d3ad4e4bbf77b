use std::fmt;
use std::str::FromStr;

use evdevil::event::{EventType, InputEvent};
use serde::Deserialize;

use crate::event::Timestamp;

pub const INPUT_EVENT_SIZE_32: usize = 16;
pub const INPUT_EVENT_SIZE_64: usize = 24;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
/// Non-standard type carrying a synthesized finger id.
pub const EV_FINGERID: u16 = 0x07;
pub const SYN_REPORT: u16 = 0;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const BTN_TOUCH: u16 = 0x14a;

/// On-the-wire size of `struct input_event`, which depends on the width of `timeval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventLayout {
    /// 32-bit `timeval`: 16 bytes per event.
    #[default]
    Compat32,
    /// 64-bit `timeval`: 24 bytes per event.
    Native64,
}

impl EventLayout {
    pub fn size(&self) -> usize {
        match self {
            EventLayout::Compat32 => INPUT_EVENT_SIZE_32,
            EventLayout::Native64 => INPUT_EVENT_SIZE_64,
        }
    }
}

impl fmt::Display for EventLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLayout::Compat32 => write!(f, "compat32"),
            EventLayout::Native64 => write!(f, "native64"),
        }
    }
}

impl FromStr for EventLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compat32" | "32" => Ok(EventLayout::Compat32),
            "native64" | "64" => Ok(EventLayout::Native64),
            _ => Err(format!(
                "Invalid event layout '{}'. Valid values: compat32, native64",
                s
            )),
        }
    }
}

/// Parse a Linux input_event from raw bytes (32-bit or 64-bit format).
pub fn parse_input_event(buf: &[u8]) -> Option<(Timestamp, InputEvent)> {
    match buf.len() {
        INPUT_EVENT_SIZE_32 => parse_input_event_32(buf),
        INPUT_EVENT_SIZE_64 => parse_input_event_64(buf),
        len if len >= INPUT_EVENT_SIZE_64 => parse_input_event_64(buf),
        len if len >= INPUT_EVENT_SIZE_32 => parse_input_event_32(buf),
        _ => None,
    }
}

fn parse_input_event_32(buf: &[u8]) -> Option<(Timestamp, InputEvent)> {
    let sec = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let usec = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let ty = u16::from_le_bytes([buf[8], buf[9]]);
    let code = u16::from_le_bytes([buf[10], buf[11]]);
    let value = i32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);

    Some((
        Timestamp::from_timeval(sec.into(), usec.into()),
        InputEvent::new(EventType::from_raw(ty), code, value),
    ))
}

fn parse_input_event_64(buf: &[u8]) -> Option<(Timestamp, InputEvent)> {
    let sec = i64::from_le_bytes(buf[0..8].try_into().ok()?);
    let usec = i64::from_le_bytes(buf[8..16].try_into().ok()?);
    let ty = u16::from_le_bytes([buf[16], buf[17]]);
    let code = u16::from_le_bytes([buf[18], buf[19]]);
    let value = i32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]);

    Some((
        Timestamp::from_timeval(sec, usec),
        InputEvent::new(EventType::from_raw(ty), code, value),
    ))
}

/// Encode an input_event in the given layout (little-endian).
pub fn encode_input_event(time: Timestamp, event: &InputEvent, layout: EventLayout) -> Vec<u8> {
    let mut buf = Vec::with_capacity(layout.size());
    match layout {
        EventLayout::Compat32 => {
            buf.extend_from_slice(&(time.secs() as i32).to_le_bytes());
            buf.extend_from_slice(&(time.subsec_micros() as i32).to_le_bytes());
        }
        EventLayout::Native64 => {
            buf.extend_from_slice(&(time.secs() as i64).to_le_bytes());
            buf.extend_from_slice(&i64::from(time.subsec_micros()).to_le_bytes());
        }
    }
    buf.extend_from_slice(&event.event_type().raw().to_le_bytes());
    buf.extend_from_slice(&event.raw_code().to_le_bytes());
    buf.extend_from_slice(&event.raw_value().to_le_bytes());
    buf
}
