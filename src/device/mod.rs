mod emulator;

pub use emulator::EMULATOR;

use crate::input::EventLayout;

/// Device-specific parameters for input handling.
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    pub name: &'static str,

    // Raw input_event layout on the device
    pub layout: EventLayout,

    // Screen the coordinates are scaled to
    pub screen_width: i32,
    pub screen_height: i32,

    // Touch panel axis maxima
    pub x_max: i32,
    pub y_max: i32,

    // Default device path
    pub touch_device: &'static str,
}

const PROFILES: &[&DeviceProfile] = &[&EMULATOR];

impl DeviceProfile {
    /// Profile used when none is configured.
    pub fn current() -> &'static Self {
        &EMULATOR
    }

    pub fn by_name(name: &str) -> Option<&'static Self> {
        PROFILES
            .iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn names() -> Vec<&'static str> {
        PROFILES.iter().map(|p| p.name).collect()
    }
}
