// Settings: global configuration stored separately from layout state.
// Uses the platform-native config dir: e.g. ~/.config/tabdock/settings.json on
// Linux, ~/Library/Application Support/tabdock/settings.json on macOS.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tabdock_layout::MIN_PANEL_FRACTION;

const DEFAULT_DRAG_ACTIVATION_DISTANCE: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockSettings {
    /// Pointer travel (px) before a tab press becomes a drag.
    pub drag_activation_distance: f32,
    /// Smallest share of a resized pair either panel may shrink to.
    pub min_panel_fraction: f32,
    /// Directory for layout files. Defaults to the config dir.
    pub state_dir: Option<PathBuf>,
}

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            drag_activation_distance: DEFAULT_DRAG_ACTIVATION_DISTANCE,
            min_panel_fraction: MIN_PANEL_FRACTION,
            state_dir: None,
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("tabdock").join("settings.json"))
}

pub fn load_settings() -> DockSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => DockSettings::default(),
    }
}

/// Read settings from `path`. A missing file means defaults; an unreadable
/// one is logged and also means defaults.
pub fn load_settings_from(path: &Path) -> DockSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                DockSettings::default()
            }
        },
        Err(_) => DockSettings::default(),
    }
}
