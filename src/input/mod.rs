pub mod event;
mod source;
mod touch;

pub use event::{encode_input_event, parse_input_event, EventLayout};
pub use source::{DeviceSource, SampleSource};
pub use touch::{Scaling, SingleTouchDecoder};
