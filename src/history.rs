// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undoable document store.
//!
//! The store owns the current document and two bounded stacks of earlier
//! and undone documents. Every new value passes through a validator before
//! it is installed, so the current document always satisfies the
//! document's structural rules. A rejected value leaves the store exactly
//! as it was.

use crate::models::dialog::DialogProject;
use crate::models::project::SceneProject;
use crate::validate::{validate_dialog_project, validate_scene_project, ValidationError};

/// Default history depth.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Validation function applied to every value entering a store.
pub type Validator<T> = fn(T) -> Result<T, ValidationError>;

/// Store for scene project documents.
pub type SceneStore = UndoableStore<SceneProject>;

/// Store for dialog project documents.
pub type DialogStore = UndoableStore<DialogProject>;

/// Current value plus bounded undo/redo history.
#[derive(Debug, Clone)]
pub struct UndoableStore<T> {
    current: T,
    /// Undo stack (past states, oldest first)
    undo_stack: Vec<T>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<T>,
    /// Maximum entries kept on each stack
    max_size: usize,
    validate: Validator<T>,
}

/// Push onto a stack, dropping the oldest entries past `max_size`.
fn push_bounded<T>(stack: &mut Vec<T>, value: T, max_size: usize) {
    stack.push(value);
    if stack.len() > max_size {
        let excess = stack.len() - max_size;
        stack.drain(..excess);
    }
}

impl<T> UndoableStore<T> {
    /// Create a store holding the validated `initial` value.
    pub fn new(initial: T, validate: Validator<T>, max_size: usize) -> Result<Self, ValidationError> {
        Ok(Self {
            current: validate(initial)?,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
            validate,
        })
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    /// Validate and install `value`, recording the previous value for undo.
    pub fn set(&mut self, value: T) -> Result<(), ValidationError> {
        let next = match (self.validate)(value) {
            Ok(next) => next,
            Err(err) => {
                log::warn!("Rejected document change: {}", err);
                return Err(err);
            }
        };
        let previous = std::mem::replace(&mut self.current, next);
        push_bounded(&mut self.undo_stack, previous, self.max_size);
        // New changes invalidate anything that was undone
        self.redo_stack.clear();
        log::debug!("Committed change, undo depth {}", self.undo_stack.len());
        Ok(())
    }

    /// Compute the next value from the current one and [`set`](Self::set) it.
    pub fn update<F>(&mut self, updater: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&T) -> T,
    {
        let next = updater(&self.current);
        self.set(next)
    }

    /// Validate and install `value`, discarding all history.
    pub fn reset(&mut self, value: T) -> Result<(), ValidationError> {
        self.current = (self.validate)(value)?;
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("Store reset, history cleared");
        Ok(())
    }

    /// Restore the previous value. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        push_bounded(&mut self.redo_stack, current, self.max_size);
        log::debug!("Undo, {} left", self.undo_stack.len());
        true
    }

    /// Re-apply the last undone value. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        push_bounded(&mut self.undo_stack, current, self.max_size);
        log::debug!("Redo, {} left", self.redo_stack.len());
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_size
    }
}

impl UndoableStore<SceneProject> {
    /// Scene store starting from an empty project.
    pub fn for_scenes(max_size: usize) -> Result<Self, ValidationError> {
        Self::new(SceneProject::empty(), validate_scene_project, max_size)
    }
}

impl UndoableStore<DialogProject> {
    /// Dialog store starting from an empty dialog project.
    pub fn for_dialogs(max_size: usize) -> Result<Self, ValidationError> {
        Self::new(DialogProject::empty(), validate_dialog_project, max_size)
    }
}
