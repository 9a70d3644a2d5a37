// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dialog project validation.

use serde_json::{Map, Value};

use super::{index, join, Checker, ValidationError};
use crate::models::dialog::DialogProject;

/// Validate an untyped dialog project and build the typed document.
///
/// Absent `version`, `dialogs`, `nodes` and `choices` take their defaults.
pub fn validate_dialog_value(value: &Value) -> Result<DialogProject, ValidationError> {
    let mut checker = Checker::default();
    if let Some(root) = checker.object("", value) {
        checker.optional_string(root, "", "version");

        let mut seen = Vec::new();
        for (i, dialog) in checker.list(root, "", "dialogs").iter().enumerate() {
            let path = index("dialogs", i);
            if let Some(dialog) = checker.object(&path, dialog) {
                let id = checker.required_string(dialog, &path, "id");
                checker.unique_id(&mut seen, id, &path, "dialog");
                check_dialog(&mut checker, dialog, &path);
            }
        }
    }
    checker.finish(value.clone())
}

/// Re-validate a typed document before it is committed.
pub fn validate_dialog_project(project: DialogProject) -> Result<DialogProject, ValidationError> {
    let value = serde_json::to_value(&project).map_err(|e| ValidationError::single("", e.to_string()))?;
    validate_dialog_value(&value)
}

fn check_dialog(checker: &mut Checker, dialog: &Map<String, Value>, path: &str) {
    let nodes_path = join(path, "nodes");
    let mut seen = Vec::new();
    for (i, node) in checker.list(dialog, path, "nodes").iter().enumerate() {
        let node_path = index(&nodes_path, i);
        let Some(node) = checker.object(&node_path, node) else {
            continue;
        };
        let id = checker.required_string(node, &node_path, "id");
        checker.unique_id(&mut seen, id, &node_path, "node");
        checker.optional_string(node, &node_path, "text");
        checker.optional_string(node, &node_path, "speaker");

        let choices_path = join(&node_path, "choices");
        for (j, choice) in checker.list(node, &node_path, "choices").iter().enumerate() {
            let choice_path = index(&choices_path, j);
            if let Some(choice) = checker.object(&choice_path, choice) {
                checker.optional_string(choice, &choice_path, "text");
                checker.optional_string(choice, &choice_path, "next");
                checker.condition(choice, &choice_path, "cond");
            }
        }
    }
}
