use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::format::OutputFormat;
use crate::input::EventLayout;

#[derive(Parser, Debug, Default)]
#[command(name = "touch-synth")]
#[command(about = "Synthesize multitouch finger events from a single-touch panel")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Touch input device path
    #[arg(long, env = "TOUCH_SYNTH_DEVICE")]
    pub device: Option<String>,

    /// Device profile supplying screen size and axis maxima
    #[arg(long)]
    pub profile: Option<String>,

    /// Screen width coordinates are scaled to
    #[arg(long)]
    pub screen_width: Option<i32>,

    /// Screen height coordinates are scaled to
    #[arg(long)]
    pub screen_height: Option<i32>,

    /// Maximum raw X value reported by the panel
    #[arg(long)]
    pub x_max: Option<i32>,

    /// Maximum raw Y value reported by the panel
    #[arg(long)]
    pub y_max: Option<i32>,

    /// Coordinates remembered per finger
    #[arg(long)]
    pub coord_buffer_size: Option<usize>,

    /// Minimum contact weight for a new finger
    #[arg(long)]
    pub finger_down_threshold: Option<i32>,

    /// Move tracked positions at most one unit per sample
    #[arg(long)]
    pub position_filter: bool,

    /// Disable the position filter (overrides config file)
    #[arg(long)]
    pub no_position_filter: bool,

    /// Simultaneous fingers to track
    #[arg(long)]
    pub max_fingers: Option<usize>,

    /// Raw records read per wake-up before yielding
    #[arg(long)]
    pub max_events_per_call: Option<usize>,

    /// Output format (events, reports, raw)
    #[arg(long, value_parser = clap::value_parser!(OutputFormat))]
    pub format: Option<OutputFormat>,

    /// input_event layout of the device and of raw output (compat32, native64)
    #[arg(long, value_parser = clap::value_parser!(EventLayout))]
    pub layout: Option<EventLayout>,

    /// Path to config file
    #[arg(long, env = "TOUCH_SYNTH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump raw input events from the touch device for debugging
    Dump {
        /// Stop after this many events (0 = run until interrupted)
        #[arg(long, default_value_t = 0)]
        count: u64,
    },
}
