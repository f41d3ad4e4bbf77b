use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::format::OutputFormat;
use crate::input::EventLayout;

const CONFIG_FILE_NAME: &str = "touch-synth.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub device: Option<String>,
    pub profile: Option<String>,
    pub screen_width: Option<i32>,
    pub screen_height: Option<i32>,
    pub x_max: Option<i32>,
    pub y_max: Option<i32>,
    pub coord_buffer_size: Option<usize>,
    pub finger_down_threshold: Option<i32>,
    #[serde(default)]
    pub position_filter: bool,
    pub max_fingers: Option<usize>,
    pub max_events_per_call: Option<usize>,
    pub format: Option<OutputFormat>,
    pub layout: Option<EventLayout>,
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            if let Some(config) = load_from_path(&path) {
                return Some(config);
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join(CONFIG_FILE_NAME));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "device = \"/dev/input/event5\"\nx_max = 4095\nposition_filter = true\nformat = \"reports\"\nlayout = \"compat32\""
        )
        .unwrap();

        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.device.as_deref(), Some("/dev/input/event5"));
        assert_eq!(config.x_max, Some(4095));
        assert!(config.position_filter);
        assert_eq!(config.format, Some(OutputFormat::Reports));
        assert_eq!(config.layout, Some(EventLayout::Compat32));
        assert_eq!(config.max_fingers, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "orientation = \"portrait\"").unwrap();
        assert!(load_from_path(file.path()).is_none());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());
    }
}
