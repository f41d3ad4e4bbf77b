//! Decode a single-touch panel (ABS_X/ABS_Y/BTN_TOUCH/SYN_REPORT) into raw frames.

use evdevil::event::InputEvent;

use super::event::{ABS_X, ABS_Y, BTN_TOUCH, EV_ABS, EV_KEY, EV_SYN, SYN_REPORT};
use crate::error::{Error, Result};
use crate::gesture::RawSample;

/// Weight reported for the panel's only contact; the hardware has no pressure axis.
const CONTACT_WEIGHT: i32 = 1;

/// Device-to-screen coordinate scale, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    pub x: f32,
    pub y: f32,
}

impl Scaling {
    pub fn new(screen_width: i32, screen_height: i32, x_max: i32, y_max: i32) -> Result<Self> {
        if screen_width <= 0 || screen_height <= 0 {
            return Err(Error::InvalidSettings(format!(
                "screen resolution {}x{} must be positive",
                screen_width, screen_height
            )));
        }
        if x_max <= 0 || y_max <= 0 {
            return Err(Error::InvalidSettings(format!(
                "axis maxima {}x{} must be positive",
                x_max, y_max
            )));
        }

        Ok(Self {
            x: screen_width as f32 / x_max as f32,
            y: screen_height as f32 / y_max as f32,
        })
    }

    pub fn identity() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    /// Scaled values are truncated toward zero.
    pub fn scale_x(&self, x: i32) -> i32 {
        (x as f32 * self.x) as i32
    }

    pub fn scale_y(&self, y: i32) -> i32 {
        (y as f32 * self.y) as i32
    }

}

pub struct SingleTouchDecoder {
    scaling: Scaling,
    x: i32,
    y: i32,
    touching: bool,
}

impl SingleTouchDecoder {
    pub fn new(scaling: Scaling) -> Self {
        Self {
            scaling,
            x: 0,
            y: 0,
            touching: false,
        }
    }

    /// Feed one raw event. Returns a frame when the event completes one.
    ///
    /// A release produces an extra frame with the contact still present so the
    /// lift-off position and time are reported; the `SYN_REPORT` after it then
    /// produces the empty frame that ends the finger.
    pub fn feed(&mut self, event: &InputEvent) -> Option<Vec<RawSample>> {
        let ty = event.event_type().raw();
        let code = event.raw_code();
        let value = event.raw_value();

        match (ty, code) {
            (EV_ABS, ABS_X) => {
                self.x = self.scaling.scale_x(value);
                None
            }
            (EV_ABS, ABS_Y) => {
                self.y = self.scaling.scale_y(value);
                None
            }
            (EV_KEY, BTN_TOUCH) => {
                self.touching = value != 0;
                if self.touching {
                    None
                } else {
                    Some(vec![self.contact()])
                }
            }
            // Other EV_SYN codes (SYN_DROPPED, SYN_CONFIG) deliberately fall through.
            (EV_SYN, SYN_REPORT) => {
                if self.touching {
                    Some(vec![self.contact()])
                } else {
                    Some(Vec::new())
                }
            }
            _ => {
                log::debug!("Ignoring raw event type {:#x} code {:#x} value {}", ty, code, value);
                None
            }
        }
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    fn contact(&self) -> RawSample {
        RawSample::new(self.x, self.y, CONTACT_WEIGHT)
    }
}
