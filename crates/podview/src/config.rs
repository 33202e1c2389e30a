//! Demo configuration. Loaded from podview.ron at startup.

use interior::{GateConfig, PodConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the scripted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodviewConfig {
    /// Settings of the transparent command pod.
    #[serde(default = "default_pod")]
    pub pod: PodConfig,
    /// Cameras and layers the culling gate drives.
    #[serde(default)]
    pub gate: GateConfig,
    /// Frames simulated after each scripted event.
    #[serde(default = "default_frames_per_step")]
    pub frames_per_step: u32,
}

fn default_pod() -> PodConfig {
    PodConfig {
        transparent_transforms: "windowFront|windowSide".to_string(),
        ..Default::default()
    }
}
fn default_frames_per_step() -> u32 {
    2
}

impl Default for PodviewConfig {
    fn default() -> Self {
        Self {
            pod: default_pod(),
            gate: GateConfig::default(),
            frames_per_step: default_frames_per_step(),
        }
    }
}

impl PodviewConfig {
    /// Load config from `path`, or `podview.ron` in the current directory.
    /// If the file is missing or invalid, returns default config.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        match std::fs::read_to_string(&path) {
            Ok(data) => match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("podview.ron")
}
