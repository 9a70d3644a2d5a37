// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project data serialization and deserialization.
//!
//! This module handles exporting and importing scene and dialog documents in
//! YAML and JSON formats. Exported files wrap the document in a versioned
//! envelope (`{ schema_version, project }`); imports accept either the
//! envelope or a bare document, and always run the structural validator.

use crate::models::dialog::DialogProject;
use crate::models::project::SceneProject;
use crate::validate::{validate_dialog_value, validate_scene_value};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Envelope version written on export.
pub const SCHEMA_VERSION: u64 = 1;

/// On-disk document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "yaml" || ext == "yml" => Format::Yaml,
            _ => Format::Json,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    schema_version: u64,
    project: &'a T,
}

/// Strip the export envelope if present.
///
/// Only `schema_version == 1` is unwrapped; anything else is taken to be a
/// bare document.
pub fn unwrap_envelope(value: Value) -> Value {
    let is_v1 = value.get("schema_version").and_then(Value::as_u64) == Some(SCHEMA_VERSION);
    match value {
        Value::Object(mut map) if is_v1 => map.remove("project").unwrap_or(Value::Null),
        other => other,
    }
}

/// Render a document wrapped in the export envelope.
pub fn to_string<T: Serialize>(document: &T, format: Format) -> Result<String> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        project: document,
    };
    let text = match format {
        Format::Json => serde_json::to_string_pretty(&envelope)?,
        Format::Yaml => serde_yaml::to_string(&envelope)?,
    };
    Ok(text)
}

/// Parse text in `format` into an untyped value with the envelope removed.
pub fn parse_value(text: &str, format: Format) -> Result<Value> {
    let value = match format {
        Format::Json => serde_json::from_str(text).context("Invalid JSON")?,
        Format::Yaml => serde_yaml::from_str(text).context("Invalid YAML")?,
    };
    Ok(unwrap_envelope(value))
}

/// Export a document to `path`, choosing the format by extension.
pub fn export<T: Serialize>(document: &T, path: &Path) -> Result<()> {
    let text = to_string(document, Format::from_path(path))?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {}", path.display());
    Ok(())
}

fn read_value(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_value(&text, Format::from_path(path)).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Import and validate a scene project.
pub fn import_scene_project(path: &Path) -> Result<SceneProject> {
    let value = read_value(path)?;
    let project = validate_scene_value(&value).with_context(|| format!("Invalid scene project {}", path.display()))?;
    log::info!("Imported {} scene(s) from {}", project.scenes.len(), path.display());
    Ok(project)
}

/// Import and validate a dialog project.
pub fn import_dialog_project(path: &Path) -> Result<DialogProject> {
    let value = read_value(path)?;
    let project = validate_dialog_value(&value).with_context(|| format!("Invalid dialog project {}", path.display()))?;
    log::info!("Imported {} dialog(s) from {}", project.dialogs.len(), path.display());
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hotspot::{Action, Hotspot, Rect};
    use crate::models::project::Scene;
    use serde_json::json;

    fn sample() -> SceneProject {
        let mut hotspot = Hotspot::rect("door", Rect { x: 0.1, y: 0.2, w: 0.3, h: 0.4 });
        hotspot.action = Some(Action::GoScene {
            scene_id: "hall".to_string(),
            transition: None,
        });
        SceneProject::empty()
            .with_scene(Scene::new("room"))
            .with_scene(Scene::new("hall"))
            .with_added_hotspot("room", hotspot)
            .unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.YML")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a")), Format::Json);
    }

    #[test]
    fn test_envelope_wraps_export() {
        let text = to_string(&sample(), Format::Json).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["project"]["scenes"][0]["id"], "room");
        assert_eq!(value["project"]["scenes"][0]["hotspots"][0]["shape"], "rect");
    }

    #[test]
    fn test_unwrap_envelope() {
        let bare = json!({ "project": { "reference_resolution": { "width": 10, "height": 10 } } });
        assert_eq!(unwrap_envelope(bare.clone()), bare);

        let wrapped = json!({ "schema_version": 1, "project": bare.clone() });
        assert_eq!(unwrap_envelope(wrapped), bare);

        // Unknown envelope versions are left alone.
        let future = json!({ "schema_version": 2, "project": {} });
        assert_eq!(unwrap_envelope(future.clone()), future);
    }

    #[test]
    fn test_scene_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let project = sample();
        for name in ["scenes.json", "scenes.yaml"] {
            let path = dir.path().join(name);
            export(&project, &path).unwrap();
            assert_eq!(import_scene_project(&path).unwrap(), project);
        }
    }

    #[test]
    fn test_import_bare_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        std::fs::write(
            &path,
            r#"{"project": {"reference_resolution": {"width": 800, "height": 600}}, "scenes": []}"#,
        )
        .unwrap();
        let project = import_scene_project(&path).unwrap();
        assert_eq!(project.project.reference_resolution.width, 800);
    }

    #[test]
    fn test_import_rejects_invalid_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"schema_version": 1, "project": {"scenes": []}}"#).unwrap();
        let err = import_scene_project(&path).unwrap_err();
        assert!(format!("{err:#}").contains("project"));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(import_scene_project(&path).is_err());
        assert!(import_scene_project(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_dialog_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialogs.yml");
        let project = DialogProject::empty();
        export(&project, &path).unwrap();
        assert_eq!(import_dialog_project(&path).unwrap(), project);
    }
}
