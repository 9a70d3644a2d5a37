// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene project validation.

use serde_json::{Map, Value};

use super::{index, join, Checker, ValidationError};
use crate::models::project::SceneProject;

const SHAPES: [&str; 3] = ["rect", "polygon", "circle"];
const ACTIONS: [&str; 5] = ["go_scene", "jump_label", "call_label", "call_screen", "function"];
const LAYERS: [&str; 2] = ["image", "color"];
const COORDS_MODES: [&str; 2] = ["relative", "absolute"];

/// Validate an untyped scene project and build the typed document.
///
/// Absent `version`, `coords_mode`, `scenes`, `layers` and `hotspots` take
/// their defaults.
pub fn validate_scene_value(value: &Value) -> Result<SceneProject, ValidationError> {
    let mut checker = Checker::default();
    if let Some(root) = checker.object("", value) {
        check_root(&mut checker, root);
    }
    checker.finish(value.clone())
}

/// Re-validate a typed document before it is committed.
pub fn validate_scene_project(project: SceneProject) -> Result<SceneProject, ValidationError> {
    let value = serde_json::to_value(&project).map_err(|e| ValidationError::single("", e.to_string()))?;
    validate_scene_value(&value)
}

fn check_root(checker: &mut Checker, root: &Map<String, Value>) {
    checker.optional_string(root, "", "version");

    if let Some(settings) = checker.required_object(root, "", "project") {
        check_settings(checker, settings);
    }

    let mut seen = Vec::new();
    for (i, scene) in checker.list(root, "", "scenes").iter().enumerate() {
        let path = index("scenes", i);
        if let Some(scene) = checker.object(&path, scene) {
            let id = checker.required_string(scene, &path, "id");
            checker.unique_id(&mut seen, id, &path, "scene");
            check_scene(checker, scene, &path);
        }
    }
}

fn check_settings(checker: &mut Checker, settings: &Map<String, Value>) {
    let path = "project";
    let res_path = join(path, "reference_resolution");
    if let Some(res) = checker.required_object(settings, path, "reference_resolution") {
        for key in ["width", "height"] {
            let Some(value) = checker.required(res, &res_path, key) else {
                continue;
            };
            let valid = value.as_u64().is_some_and(|n| n > 0 && n <= u64::from(u32::MAX));
            if !valid {
                checker.push(join(&res_path, key), "expected a positive integer");
            }
        }
    }

    if let Some(mode) = checker.optional_string(settings, path, "coords_mode") {
        check_enum(checker, &join(path, "coords_mode"), mode, &COORDS_MODES);
    }
}

fn check_enum(checker: &mut Checker, path: &str, value: &str, allowed: &[&str]) -> bool {
    let known = allowed.contains(&value);
    if !known {
        checker.push(path, format!("unknown value '{value}', expected one of: {}", allowed.join(", ")));
    }
    known
}

fn check_transition(checker: &mut Checker, obj: &Map<String, Value>, path: &str, key: &str) {
    if let Some(transition) = checker.optional_object(obj, path, key) {
        let path = join(path, key);
        checker.required_string(transition, &path, "type");
        checker.optional_number(transition, &path, "duration");
        checker.optional_string(transition, &path, "easing");
    }
}

fn check_scene(checker: &mut Checker, scene: &Map<String, Value>, path: &str) {
    checker.optional_string(scene, path, "name");
    check_transition(checker, scene, path, "enter_transition");

    let layers_path = join(path, "layers");
    for (i, layer) in checker.list(scene, path, "layers").iter().enumerate() {
        let layer_path = index(&layers_path, i);
        if let Some(layer) = checker.object(&layer_path, layer) {
            check_layer(checker, layer, &layer_path);
        }
    }

    let hotspots_path = join(path, "hotspots");
    let mut seen = Vec::new();
    for (i, hotspot) in checker.list(scene, path, "hotspots").iter().enumerate() {
        let hotspot_path = index(&hotspots_path, i);
        if let Some(hotspot) = checker.object(&hotspot_path, hotspot) {
            let id = checker.required_string(hotspot, &hotspot_path, "id");
            checker.unique_id(&mut seen, id, &hotspot_path, "hotspot");
            check_hotspot(checker, hotspot, &hotspot_path);
        }
    }
}

fn check_layer(checker: &mut Checker, layer: &Map<String, Value>, path: &str) {
    checker.required_string(layer, path, "id");
    if let Some(kind) = checker.required_string(layer, path, "type") {
        if check_enum(checker, &join(path, "type"), kind, &LAYERS) {
            // The variant's payload field is named after the tag.
            checker.required_string(layer, path, kind);
        }
    }

    if let Some(alpha) = checker.optional_number(layer, path, "alpha") {
        if !(0.0..=1.0).contains(&alpha) {
            checker.push(join(path, "alpha"), "alpha must be between 0 and 1");
        }
    }
    if let Some(zorder) = layer.get("zorder") {
        if zorder.as_i64().is_none() {
            checker.push(join(path, "zorder"), "expected an integer");
        }
    }
    check_transition(checker, layer, path, "enter_transition");
    check_transition(checker, layer, path, "exit_transition");
}

fn check_hotspot(checker: &mut Checker, hotspot: &Map<String, Value>, path: &str) {
    if let Some(shape) = checker.required_string(hotspot, path, "shape") {
        if check_enum(checker, &join(path, "shape"), shape, &SHAPES) {
            check_geometry(checker, hotspot, path, shape);
        }
    }

    checker.optional_bool(hotspot, path, "hidden");
    checker.optional_string(hotspot, path, "tooltip");
    checker.optional_object(hotspot, path, "hover_effect");
    checker.condition(hotspot, path, "visible_if");
    checker.condition(hotspot, path, "enabled_if");

    if let Some(action) = checker.optional_object(hotspot, path, "action") {
        check_action(checker, action, &join(path, "action"));
    }
}

fn check_geometry(checker: &mut Checker, hotspot: &Map<String, Value>, path: &str, shape: &str) {
    match shape {
        "rect" => {
            if let Some(rect) = checker.required_object(hotspot, path, "rect") {
                let rect_path = join(path, "rect");
                for key in ["x", "y", "w", "h"] {
                    checker.required_number(rect, &rect_path, key);
                }
            }
        }
        "circle" => {
            if let Some(circle) = checker.required_object(hotspot, path, "circle") {
                let circle_path = join(path, "circle");
                for key in ["cx", "cy", "r"] {
                    checker.required_number(circle, &circle_path, key);
                }
            }
        }
        _ => {
            let Some(points) = checker.required(hotspot, path, "points") else {
                return;
            };
            let points_path = join(path, "points");
            let Some(points) = points.as_array() else {
                checker.push(points_path, "expected an array of [x, y] pairs");
                return;
            };
            for (i, point) in points.iter().enumerate() {
                let point_path = index(&points_path, i);
                match point.as_array() {
                    Some(pair) if pair.len() == 2 => {
                        for (axis, coord) in pair.iter().enumerate() {
                            checker.number_value(index(&point_path, axis), coord);
                        }
                    }
                    _ => checker.push(point_path, "expected an [x, y] pair"),
                }
            }
        }
    }

    for other in ["rect", "points", "circle"] {
        let owner = if other == "points" { "polygon" } else { other };
        if owner != shape && hotspot.contains_key(other) {
            checker.push(join(path, other), format!("field does not belong to a {shape} hotspot"));
        }
    }
}

fn check_action(checker: &mut Checker, action: &Map<String, Value>, path: &str) {
    let Some(kind) = checker.required_string(action, path, "type") else {
        return;
    };
    if !check_enum(checker, &join(path, "type"), kind, &ACTIONS) {
        return;
    }
    match kind {
        "go_scene" => {
            checker.required_string(action, path, "scene_id");
            check_transition(checker, action, path, "transition");
        }
        "jump_label" | "call_label" => {
            checker.required_string(action, path, "label");
        }
        "call_screen" => {
            checker.required_string(action, path, "screen");
            checker.optional_object(action, path, "params");
        }
        _ => {
            checker.required_string(action, path, "name");
            checker.optional_object(action, path, "params");
        }
    }
}
