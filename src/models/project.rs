// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene project documents.
//!
//! A project holds the reference resolution and coordinate mode shared by
//! every scene, and the scenes themselves with their layers and hotspots.
//! Documents are plain values: edits build a new document from the old one
//! and never modify a document that may still be held by undo history.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::hotspot::Hotspot;

/// Version written into new documents and assumed when absent.
pub const DEFAULT_VERSION: &str = "1.0";

/// Unit system of every hotspot coordinate in a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordsMode {
    /// Fractions of the reference resolution (nominally 0..1, not clamped).
    #[default]
    Relative,
    /// Reference-resolution units.
    Absolute,
}

impl std::fmt::Display for CoordsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CoordsMode::Relative => "relative",
            CoordsMode::Absolute => "absolute",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown coordinate mode '{0}', expected 'relative' or 'absolute'")]
pub struct ParseCoordsModeError(String);

impl FromStr for CoordsMode {
    type Err = ParseCoordsModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relative" => Ok(CoordsMode::Relative),
            "absolute" => Ok(CoordsMode::Absolute),
            other => Err(ParseCoordsModeError(other.to_string())),
        }
    }
}

/// Nominal pixel size that absolute coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceResolution {
    pub width: u32,
    pub height: u32,
}

impl Default for ReferenceResolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Project-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub reference_resolution: ReferenceResolution,
    #[serde(default)]
    pub coords_mode: CoordsMode,
}

/// Enter or exit transition of a scene, layer or action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

/// What a layer paints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerFill {
    Image { image: String },
    Color { color: String },
}

fn default_alpha() -> f64 {
    1.0
}

/// A visual layer of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(flatten)]
    pub fill: LayerFill,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub zorder: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter_transition: Option<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_transition: Option<Transition>,
}

impl Layer {
    /// Image source, for image layers.
    pub fn image_src(&self) -> Option<&str> {
        match &self.fill {
            LayerFill::Image { image } => Some(image),
            LayerFill::Color { .. } => None,
        }
    }
}

/// A scene: layers to draw and hotspots to interact with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter_transition: Option<Transition>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            enter_transition: None,
            layers: Vec::new(),
            hotspots: Vec::new(),
        }
    }

    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    /// Display label: the name when set, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Complete scene project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneProject {
    #[serde(default = "default_version")]
    pub version: String,
    pub project: ProjectSettings,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl Default for SceneProject {
    fn default() -> Self {
        Self::empty()
    }
}

impl SceneProject {
    /// Create an empty project at the default reference resolution.
    pub fn empty() -> Self {
        Self {
            version: default_version(),
            project: ProjectSettings::default(),
            scenes: Vec::new(),
        }
    }

    pub fn coords_mode(&self) -> CoordsMode {
        self.project.coords_mode
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    fn scene_index(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == id)
    }

    /// New document with `scene` appended.
    pub fn with_scene(&self, scene: Scene) -> Self {
        let mut next = self.clone();
        next.scenes.push(scene);
        next
    }

    /// New document with `hotspot` appended to the scene `scene_id`.
    ///
    /// Returns `None` if the scene does not exist.
    pub fn with_added_hotspot(&self, scene_id: &str, hotspot: Hotspot) -> Option<Self> {
        let si = self.scene_index(scene_id)?;
        let mut next = self.clone();
        next.scenes[si].hotspots.push(hotspot);
        Some(next)
    }

    /// New document with hotspot `index` of scene `scene_id` replaced.
    pub fn with_replaced_hotspot(&self, scene_id: &str, index: usize, hotspot: Hotspot) -> Option<Self> {
        let si = self.scene_index(scene_id)?;
        if index >= self.scenes[si].hotspots.len() {
            return None;
        }
        let mut next = self.clone();
        next.scenes[si].hotspots[index] = hotspot;
        Some(next)
    }

    /// New document with the hotspot `hotspot_id` of scene `scene_id` edited by `edit`.
    ///
    /// The closure works on a copy; `self` is never modified.
    pub fn with_hotspot<F>(&self, scene_id: &str, hotspot_id: &str, edit: F) -> Option<Self>
    where
        F: FnOnce(&mut Hotspot),
    {
        let si = self.scene_index(scene_id)?;
        let hi = self.scenes[si].hotspots.iter().position(|h| h.id == hotspot_id)?;
        let mut next = self.clone();
        edit(&mut next.scenes[si].hotspots[hi]);
        Some(next)
    }

    /// New document without the hotspot `hotspot_id` of scene `scene_id`.
    pub fn without_hotspot(&self, scene_id: &str, hotspot_id: &str) -> Option<Self> {
        let si = self.scene_index(scene_id)?;
        let hi = self.scenes[si].hotspots.iter().position(|h| h.id == hotspot_id)?;
        let mut next = self.clone();
        next.scenes[si].hotspots.remove(hi);
        Some(next)
    }
}
