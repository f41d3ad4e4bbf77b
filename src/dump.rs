//! Dump raw input events from the touch device for debugging.

use touch_synth::config::Config;
use touch_synth::input::event::{ABS_X, ABS_Y, BTN_TOUCH, EV_ABS, EV_KEY, EV_SYN, SYN_REPORT};
use touch_synth::input::{DeviceSource, SampleSource};

fn code_name(ty: u16, code: u16) -> String {
    match (ty, code) {
        (EV_SYN, SYN_REPORT) => "SYN_REPORT".into(),
        (EV_SYN, _) => format!("SYN/{}", code),
        (EV_KEY, BTN_TOUCH) => "BTN_TOUCH".into(),
        (EV_KEY, _) => format!("KEY/{}", code),
        (EV_ABS, ABS_X) => format!("ABS_X({})", code),
        (EV_ABS, ABS_Y) => format!("ABS_Y({})", code),
        (EV_ABS, 0x18) => format!("ABS_PRESSURE({})", code),
        (EV_ABS, _) => format!("ABS_?({})", code),
        _ => format!("type{} code{}", ty, code),
    }
}

pub fn run_dump(config: &Config, count: u64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut source = DeviceSource::open(&config.device, config.layout)?;
    eprintln!("Dumping touch events from {} (Ctrl+C to stop):\n", config.device);

    let mut n = 0u64;
    while count == 0 || n < count {
        let Some(ev) = source.read_event()? else {
            continue;
        };
        n += 1;
        let name = code_name(ev.event_type().raw(), ev.raw_code());
        println!("{:6}  {}  value={}", n, name, ev.raw_value());
    }
    Ok(())
}
