mod cli;
mod file;

pub use cli::{Cli, Command};
pub use file::FileConfig;

use std::path::PathBuf;

use crate::device::DeviceProfile;
use crate::driver::DEFAULT_MAX_EVENTS_PER_CALL;
use crate::error::{Error, Result};
use crate::format::OutputFormat;
use crate::gesture::{GestureSettings, DEFAULT_COORD_BUFFER_SIZE, DEFAULT_MAX_FINGERS};
use crate::input::{EventLayout, Scaling};

/// Merged configuration from CLI args, TOML file and device profile.
#[derive(Debug, Clone)]
pub struct Config {
    pub device: String,
    pub profile: &'static DeviceProfile,
    pub screen_width: i32,
    pub screen_height: i32,
    pub x_max: i32,
    pub y_max: i32,
    pub coord_buffer_size: usize,
    pub finger_down_threshold: i32,
    pub position_filter: bool,
    pub max_fingers: usize,
    pub max_events_per_call: usize,
    pub format: OutputFormat,
    pub layout: EventLayout,
}

impl Config {
    /// Load configuration by merging the TOML file with CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = cli
            .config
            .as_ref()
            .and_then(|p| file::load_from_path(p))
            .or_else(file::load_from_default_paths)
            .unwrap_or_default();

        Self::merge(cli, file_config)
    }

    /// Merge CLI values over file values over profile defaults.
    pub fn merge(cli: &Cli, file_config: FileConfig) -> Result<Self> {
        let profile = match cli.profile.as_deref().or(file_config.profile.as_deref()) {
            Some(name) => DeviceProfile::by_name(name).ok_or_else(|| {
                Error::Config(format!(
                    "Unknown device profile '{}'. Valid values: {}",
                    name,
                    DeviceProfile::names().join(", ")
                ))
            })?,
            None => DeviceProfile::current(),
        };

        Ok(Self {
            device: cli
                .device
                .clone()
                .unwrap_or_else(|| file_config.device.unwrap_or(profile.touch_device.into())),
            profile,
            screen_width: cli
                .screen_width
                .or(file_config.screen_width)
                .unwrap_or(profile.screen_width),
            screen_height: cli
                .screen_height
                .or(file_config.screen_height)
                .unwrap_or(profile.screen_height),
            x_max: cli.x_max.or(file_config.x_max).unwrap_or(profile.x_max),
            y_max: cli.y_max.or(file_config.y_max).unwrap_or(profile.y_max),
            coord_buffer_size: cli
                .coord_buffer_size
                .or(file_config.coord_buffer_size)
                .unwrap_or(DEFAULT_COORD_BUFFER_SIZE),
            finger_down_threshold: cli
                .finger_down_threshold
                .or(file_config.finger_down_threshold)
                .unwrap_or(0),
            position_filter: if cli.no_position_filter {
                false
            } else {
                cli.position_filter || file_config.position_filter
            },
            max_fingers: cli
                .max_fingers
                .or(file_config.max_fingers)
                .unwrap_or(DEFAULT_MAX_FINGERS),
            max_events_per_call: cli
                .max_events_per_call
                .or(file_config.max_events_per_call)
                .unwrap_or(DEFAULT_MAX_EVENTS_PER_CALL),
            format: cli.format.or(file_config.format).unwrap_or_default(),
            layout: cli.layout.or(file_config.layout).unwrap_or(profile.layout),
        })
    }

    pub fn gesture_settings(&self) -> GestureSettings {
        GestureSettings {
            coord_buffer_size: self.coord_buffer_size,
            finger_down_weight_threshold: self.finger_down_threshold,
            position_filter_enabled: self.position_filter,
            max_fingers: self.max_fingers,
        }
    }

    pub fn scaling(&self) -> Result<Scaling> {
        Scaling::new(self.screen_width, self.screen_height, self.x_max, self.y_max)
    }

    pub fn device_path(&self) -> PathBuf {
        PathBuf::from(&self.device)
    }

    pub fn validate(&self) -> Result<()> {
        if self.device.is_empty() {
            return Err(Error::Config("No touch device configured".into()));
        }
        if self.max_events_per_call == 0 {
            return Err(Error::Config("max_events_per_call must be at least 1".into()));
        }
        self.gesture_settings()
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;
        self.scaling().map_err(|e| Error::Config(e.to_string()))?;
        Ok(())
    }
}
