// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dialog project documents.
//!
//! Dialogs are node graphs: each node has optional text and speaker, and a
//! list of choices that may point at another node and may be guarded by a
//! condition expression.

use serde::{Deserialize, Serialize};

use super::project::DEFAULT_VERSION;

/// A player choice leading out of a dialog node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub text: String,
    /// Id of the node this choice leads to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Condition expression; the choice is offered only when it holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cond: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialog {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<DialogNode>,
}

impl Dialog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&DialogNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Complete dialog project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogProject {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub dialogs: Vec<Dialog>,
}

impl Default for DialogProject {
    fn default() -> Self {
        Self::empty()
    }
}

impl DialogProject {
    /// New project with a single empty dialog named `dlg_1`.
    pub fn empty() -> Self {
        Self {
            version: default_version(),
            dialogs: vec![Dialog::new("dlg_1")],
        }
    }

    pub fn dialog(&self, id: &str) -> Option<&Dialog> {
        self.dialogs.iter().find(|d| d.id == id)
    }
}
