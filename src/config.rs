use crate::result::Result;
use crate::sampler::{DEFAULT_SLICE_COUNT, MIN_SLICE_COUNT};
use crate::state::ViewState;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub initial: ViewState,
    pub slice_count: usize,
    pub sphere_subdivisions: u32,
    pub window_title: String,
    pub window_size: (u32, u32),
    /// Side length in pixels of the CPU rasters used in headless mode.
    pub headless_resolution: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial: ViewState::default(),
            slice_count: DEFAULT_SLICE_COUNT,
            sphere_subdivisions: 128,
            window_title: "Datacube Explorer".to_string(),
            window_size: (1600, 900),
            headless_resolution: 48,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn load(path: &Path) -> Result<Settings> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    fn sanitized(self) -> Settings {
        Settings {
            initial: self.initial.sanitized(),
            slice_count: self.slice_count.max(MIN_SLICE_COUNT),
            sphere_subdivisions: self.sphere_subdivisions.max(8),
            headless_resolution: self.headless_resolution.max(1),
            ..self
        }
    }
}
