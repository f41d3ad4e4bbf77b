//! Multitouch finger tracking and event synthesis for single-touch panels.
//!
//! Raw touch samples are matched to tracked fingers frame by frame and
//! re-emitted as kernel-style events (`FingerId`, `AxisX`, `AxisY`,
//! `ButtonTouch`, `Sync`), so consumers can treat the panel like real
//! multitouch hardware.

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod event;
pub mod format;
pub mod gesture;
pub mod input;
pub mod report;

pub use driver::FrameDriver;
pub use error::{Error, Result};
pub use event::{Event, EventBatch, EventKind, Timestamp};
pub use gesture::{GestureEngine, GestureSettings, RawSample};
