// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.

use crate::history::DEFAULT_MAX_HISTORY;
use crate::io::media::DEFAULT_MAX_BYTES;
use crate::io::serialization::Format;
use crate::models::project::SceneProject;
use crate::util::geometry::{GeometryError, Viewport};
use crate::util::shape::HANDLE_TOLERANCE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for an editing session. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo/redo depth
    pub max_history: usize,
    /// Pick radius for handles, in canvas pixels
    pub handle_tolerance: f64,
    /// Image cache budget in bytes
    pub image_cache_bytes: usize,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            handle_tolerance: HANDLE_TOLERANCE,
            image_cache_bytes: DEFAULT_MAX_BYTES,
            canvas_width: 960.0,
            canvas_height: 540.0,
        }
    }
}

impl EditorConfig {
    /// Load from a YAML or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = match Format::from_path(path) {
            Format::Yaml => serde_yaml::from_str(&text)?,
            Format::Json => serde_json::from_str(&text)?,
        };
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Viewport mapping `project` onto the configured canvas.
    pub fn viewport(&self, project: &SceneProject) -> Result<Viewport, GeometryError> {
        Viewport::new(project, self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.max_history, 50);
        assert_eq!(config.handle_tolerance, 6.0);
        assert_eq!(config.image_cache_bytes, 50 * 1024 * 1024);
        assert_eq!(config.viewport(&SceneProject::empty()).unwrap().canvas_size(), (960.0, 540.0));
    }

    #[test]
    fn test_load_partial_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("editor.yaml");
        std::fs::write(&yaml, "max_history: 10\ncanvas_width: 1920\n").unwrap();
        let config = EditorConfig::load(&yaml).unwrap();
        assert_eq!(config.max_history, 10);
        assert_eq!(config.canvas_width, 1920.0);
        assert_eq!(config.canvas_height, 540.0);

        let json = dir.path().join("editor.json");
        std::fs::write(&json, r#"{"handle_tolerance": 8}"#).unwrap();
        assert_eq!(EditorConfig::load(&json).unwrap().handle_tolerance, 8.0);
    }

    #[test]
    fn test_degenerate_canvas() {
        let config = EditorConfig {
            canvas_width: 0.0,
            ..EditorConfig::default()
        };
        assert!(config.viewport(&SceneProject::empty()).is_err());
    }
}
