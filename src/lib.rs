// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot scene authoring core.
//!
//! Scene documents describe layered scenes with interactive rect, polygon
//! and circle hotspots. This crate keeps canvas pixels and stored project
//! coordinates in sync, hit tests and edits hotspot shapes, validates
//! documents and wraps every change in a bounded undo/redo store.

pub mod config;
pub mod editor;
pub mod history;
pub mod io;
pub mod models;
pub mod util;
pub mod validate;

pub use config::EditorConfig;
pub use editor::{EditorError, SceneEditor};
pub use history::{DialogStore, SceneStore, UndoableStore};
pub use validate::{Issue, ValidationError};
