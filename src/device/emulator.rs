use super::DeviceProfile;
use crate::input::EventLayout;

/// QEMU x86 emulator with an absolute-pointer touchscreen.
///
/// The framebuffer reports bogus geometry under qemux86, so the screen size
/// is fixed here. The emulated tablet reports 0..0x7fff on both axes.
pub const EMULATOR: DeviceProfile = DeviceProfile {
    name: "emulator",

    layout: EventLayout::Native64,

    screen_width: 1024,
    screen_height: 768,

    x_max: 32767,
    y_max: 32767,

    touch_device: "/dev/input/touchscreen0",
};
