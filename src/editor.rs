// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene editing session.
//!
//! [`SceneEditor`] ties a scene store to the active scene, the selection and
//! at most one drag session. Pointer events arrive in canvas pixels; every
//! edit is applied to a copy of the hotspot and committed as a whole new
//! document through the store, so undo/redo and validation cover drags the
//! same way they cover any other change.

use crate::config::EditorConfig;
use crate::history::SceneStore;
use crate::io::media::ImageCache;
use crate::models::hotspot::Hotspot;
use crate::models::project::{CoordsMode, Scene, SceneProject};
use crate::util::geometry::{convert_mode, GeometryError, Viewport};
use crate::util::shape::{hit_test_scene, DragSession, Hit, HitKind};
use crate::validate::ValidationError;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("no active scene")]
    NoActiveScene,
    #[error("scene not found: {0}")]
    UnknownScene(String),
    #[error("hotspot not found: {0}")]
    UnknownHotspot(String),
}

/// Interactive editing state for one scene project.
#[derive(Debug)]
pub struct SceneEditor {
    store: SceneStore,
    config: EditorConfig,
    /// Id of the scene being edited
    active_scene: Option<String>,
    /// Index of the selected hotspot in the active scene
    selected: Option<usize>,
    /// Drag in progress, if any
    drag: Option<DragSession>,
    /// Decoded layer images, budgeted by `config.image_cache_bytes`
    images: ImageCache,
}

impl SceneEditor {
    /// Create an editor holding an empty project.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        Ok(Self {
            store: SceneStore::for_scenes(config.max_history)?,
            active_scene: None,
            selected: None,
            drag: None,
            images: ImageCache::new(config.image_cache_bytes),
            config,
        })
    }

    /// Replace the document, dropping history, and activate its first scene.
    pub fn load(&mut self, project: SceneProject) -> Result<(), EditorError> {
        self.store.reset(project)?;
        self.active_scene = self.store.get().scenes.first().map(|s| s.id.clone());
        self.selected = None;
        self.drag = None;
        self.images.clear();
        log::info!("Loaded project with {} scene(s)", self.store.get().scenes.len());
        Ok(())
    }

    pub fn project(&self) -> &SceneProject {
        self.store.get()
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.project().scene(self.active_scene.as_deref()?)
    }

    fn active_scene_id(&self) -> Result<String, EditorError> {
        self.active_scene().map(|s| s.id.clone()).ok_or(EditorError::NoActiveScene)
    }

    /// Switch to scene `id`, ending any drag and clearing the selection.
    pub fn select_scene(&mut self, id: &str) -> Result<(), EditorError> {
        let scene = self
            .project()
            .scene(id)
            .ok_or_else(|| EditorError::UnknownScene(id.to_string()))?;
        log::debug!("Switched to scene {}", scene.label());
        self.active_scene = Some(id.to_string());
        self.selected = None;
        self.drag = None;
        Ok(())
    }

    pub fn selected_hotspot(&self) -> Option<&Hotspot> {
        self.active_scene()?.hotspots.get(self.selected?)
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Decode the active scene's image layers into the image cache.
    ///
    /// Sources resolve against `base_dir`. Returns how many images loaded;
    /// unreadable images are skipped.
    pub fn preload_active_scene(&mut self, base_dir: &Path) -> Result<usize, EditorError> {
        let id = self.active_scene.as_deref().ok_or(EditorError::NoActiveScene)?;
        let scene = self.store.get().scene(id).ok_or(EditorError::NoActiveScene)?;
        Ok(self.images.preload_scene(scene, base_dir))
    }

    /// Viewport for the current document on the configured canvas.
    pub fn viewport(&self) -> Result<Viewport, GeometryError> {
        self.config.viewport(self.project())
    }

    /// Append a scene and make it active.
    pub fn add_scene(&mut self, scene: Scene) -> Result<(), EditorError> {
        let id = scene.id.clone();
        self.store.update(|p| p.with_scene(scene))?;
        self.active_scene = Some(id);
        self.selected = None;
        Ok(())
    }

    /// Append a hotspot to the active scene and select it.
    pub fn add_hotspot(&mut self, hotspot: Hotspot) -> Result<(), EditorError> {
        let scene_id = self.active_scene_id()?;
        let next = self
            .project()
            .with_added_hotspot(&scene_id, hotspot)
            .ok_or(EditorError::NoActiveScene)?;
        self.store.set(next)?;
        self.selected = self.active_scene().map(|s| s.hotspots.len() - 1);
        Ok(())
    }

    /// Remove hotspot `id` from the active scene.
    pub fn remove_hotspot(&mut self, id: &str) -> Result<(), EditorError> {
        let scene_id = self.active_scene_id()?;
        let next = self
            .project()
            .without_hotspot(&scene_id, id)
            .ok_or_else(|| EditorError::UnknownHotspot(id.to_string()))?;
        self.store.set(next)?;
        self.selected = None;
        self.drag = None;
        Ok(())
    }

    /// Apply `edit` to a copy of hotspot `id` in the active scene and commit it.
    pub fn edit_hotspot<F>(&mut self, id: &str, edit: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut Hotspot),
    {
        let scene_id = self.active_scene_id()?;
        let next = self
            .project()
            .with_hotspot(&scene_id, id, edit)
            .ok_or_else(|| EditorError::UnknownHotspot(id.to_string()))?;
        self.store.set(next)?;
        Ok(())
    }

    /// Convert the whole document to `mode` as one undoable change.
    pub fn set_coords_mode(&mut self, mode: CoordsMode) -> Result<(), EditorError> {
        if self.project().coords_mode() == mode {
            return Ok(());
        }
        let next = convert_mode(self.project(), mode)?;
        self.store.set(next)?;
        Ok(())
    }

    /// Commit `hotspot` at `index` of the active scene.
    fn commit_hotspot(&mut self, index: usize, hotspot: Hotspot) -> Result<(), EditorError> {
        let scene_id = self.active_scene_id()?;
        let next = self
            .project()
            .with_replaced_hotspot(&scene_id, index, hotspot)
            .ok_or(EditorError::NoActiveScene)?;
        self.store.set(next)?;
        Ok(())
    }

    /// Start a drag at `(px, py)`.
    ///
    /// Returns the hit that started the drag. Presses while a drag is
    /// already active are ignored, and a press on empty canvas clears the
    /// selection. A press on a polygon edge midpoint inserts the new vertex
    /// immediately as its own undoable change.
    pub fn pointer_down(&mut self, px: f64, py: f64) -> Result<Option<Hit>, EditorError> {
        if self.drag.is_some() {
            return Ok(None);
        }
        let view = self.viewport()?;
        let scene = self.active_scene().ok_or(EditorError::NoActiveScene)?;
        let Some(hit) = hit_test_scene(&view, scene, px, py, self.config.handle_tolerance) else {
            self.selected = None;
            return Ok(None);
        };

        let mut hotspot = scene.hotspots[hit.hotspot_index].clone();
        let session = DragSession::start(hit, &mut hotspot, &view, px, py);
        if let HitKind::AddVertex(_) = hit.kind {
            self.commit_hotspot(hit.hotspot_index, hotspot)?;
        }

        self.selected = Some(hit.hotspot_index);
        self.drag = Some(session);
        log::debug!("Started {:?} drag of hotspot {}", session.mode, hit.hotspot_index);
        Ok(Some(hit))
    }

    /// Apply a pointer move to the active drag.
    ///
    /// Returns `false` when no drag is active. A rejected edit leaves both
    /// the document and the drag where they were.
    pub fn pointer_move(&mut self, px: f64, py: f64) -> Result<bool, EditorError> {
        let Some(mut session) = self.drag else {
            return Ok(false);
        };
        let view = self.viewport()?;
        let Some(mut hotspot) = self
            .active_scene()
            .and_then(|s| s.hotspots.get(session.hotspot_index))
            .cloned()
        else {
            self.drag = None;
            return Ok(false);
        };

        session.apply(&mut hotspot, &view, px, py);
        self.commit_hotspot(session.hotspot_index, hotspot)?;
        self.drag = Some(session);
        Ok(true)
    }

    /// End the active drag, if any.
    pub fn pointer_up(&mut self) {
        if let Some(session) = self.drag.take() {
            log::debug!("Finished drag of hotspot {}", session.hotspot_index);
        }
    }

    pub fn undo(&mut self) -> bool {
        self.drag = None;
        let changed = self.store.undo();
        self.fix_selection();
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.drag = None;
        let changed = self.store.redo();
        self.fix_selection();
        changed
    }

    /// Drop references that no longer exist after history moved.
    fn fix_selection(&mut self) {
        if self.active_scene().is_none() {
            self.active_scene = self.project().scenes.first().map(|s| s.id.clone());
            self.selected = None;
        }
        let count = self.active_scene().map_or(0, |s| s.hotspots.len());
        if self.selected.is_some_and(|i| i >= count) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hotspot::{Circle, Geometry, Point, Rect};
    use crate::models::project::{Layer, LayerFill, ReferenceResolution};
    use crate::util::shape::DragMode;

    fn editor() -> SceneEditor {
        let config = EditorConfig {
            canvas_width: 100.0,
            canvas_height: 100.0,
            ..EditorConfig::default()
        };
        let mut project = SceneProject::empty().with_scene(Scene::new("room"));
        project.project.reference_resolution = ReferenceResolution { width: 100, height: 100 };
        let mut editor = SceneEditor::new(config).unwrap();
        editor.load(project).unwrap();
        editor
    }

    fn hotspot(editor: &SceneEditor, index: usize) -> &Hotspot {
        &editor.active_scene().unwrap().hotspots[index]
    }

    #[test]
    fn test_load_selects_first_scene() {
        let editor = editor();
        assert_eq!(editor.active_scene().unwrap().id, "room");
        assert!(!editor.store().can_undo());

        let mut empty = SceneEditor::new(EditorConfig::default()).unwrap();
        assert!(empty.active_scene().is_none());
        let err = empty.add_hotspot(Hotspot::rect("r", Rect { x: 0.0, y: 0.0, w: 0.1, h: 0.1 }));
        assert!(matches!(err, Err(EditorError::NoActiveScene)));
        assert!(matches!(empty.pointer_down(1.0, 1.0), Err(EditorError::NoActiveScene)));
    }

    #[test]
    fn test_drag_rect_commits_each_move() {
        let mut editor = editor();
        editor
            .add_hotspot(Hotspot::rect("r", Rect { x: 0.25, y: 0.25, w: 0.25, h: 0.25 }))
            .unwrap();
        let before = editor.project().clone();

        let hit = editor.pointer_down(30.0, 30.0).unwrap().unwrap();
        assert_eq!(hit.kind, HitKind::Move);
        assert!(editor.pointer_move(42.5, 30.0).unwrap());
        assert!(editor.pointer_move(55.0, 55.0).unwrap());
        editor.pointer_up();
        assert!(!editor.pointer_move(60.0, 60.0).unwrap());

        let Geometry::Rect { rect } = &hotspot(&editor, 0).geometry else {
            panic!("expected rect");
        };
        assert_eq!((rect.x, rect.y), (0.5, 0.5));
        assert_eq!((rect.w, rect.h), (0.25, 0.25));
        // Add plus two moves.
        assert_eq!(editor.store().undo_len(), 3);

        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.project(), &before);
    }

    #[test]
    fn test_edge_midpoint_press_inserts_vertex() {
        let mut editor = editor();
        editor
            .add_hotspot(Hotspot::polygon(
                "p",
                vec![Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(0.0, 0.5)],
            ))
            .unwrap();

        let hit = editor.pointer_down(25.0, 0.0).unwrap().unwrap();
        assert_eq!(hit.kind, HitKind::AddVertex(0));
        assert_eq!(hotspot(&editor, 0).points().unwrap().len(), 4);
        assert_eq!(editor.drag().unwrap().mode, DragMode::Vertex(1));

        editor.pointer_move(25.0, -25.0).unwrap();
        editor.pointer_up();
        assert_eq!(hotspot(&editor, 0).points().unwrap()[1], Point::new(0.25, -0.25));

        // Undo the move, then the insertion.
        editor.undo();
        assert_eq!(hotspot(&editor, 0).points().unwrap()[1], Point::new(0.25, 0.0));
        editor.undo();
        assert_eq!(hotspot(&editor, 0).points().unwrap().len(), 3);
    }

    #[test]
    fn test_press_during_drag_is_ignored() {
        let mut editor = editor();
        editor
            .add_hotspot(Hotspot::circle("c", Circle { cx: 0.5, cy: 0.5, r: 0.25 }))
            .unwrap();
        let hit = editor.pointer_down(75.0, 50.0).unwrap().unwrap();
        assert_eq!(hit.kind, HitKind::Radius);
        assert_eq!(editor.pointer_down(50.0, 50.0).unwrap(), None);
        assert_eq!(editor.drag().unwrap().mode, DragMode::Radius);

        editor.pointer_move(50.0, 0.0).unwrap();
        let Geometry::Circle { circle } = &hotspot(&editor, 0).geometry else {
            panic!("expected circle");
        };
        assert_eq!(circle.r, 0.5);
    }

    #[test]
    fn test_empty_press_clears_selection() {
        let mut editor = editor();
        editor
            .add_hotspot(Hotspot::rect("r", Rect { x: 0.0, y: 0.0, w: 0.25, h: 0.25 }))
            .unwrap();
        assert_eq!(editor.selected_hotspot().unwrap().id, "r");
        assert_eq!(editor.pointer_down(90.0, 90.0).unwrap(), None);
        assert!(editor.selected_hotspot().is_none());
        assert!(editor.drag().is_none());
    }

    #[test]
    fn test_rejected_edit_keeps_document() {
        let mut editor = editor();
        editor
            .add_hotspot(Hotspot::rect("r", Rect { x: 0.0, y: 0.0, w: 0.25, h: 0.25 }))
            .unwrap();
        let err = editor.add_hotspot(Hotspot::rect("r", Rect { x: 0.5, y: 0.5, w: 0.1, h: 0.1 }));
        assert!(matches!(err, Err(EditorError::Validation(_))));
        assert_eq!(editor.active_scene().unwrap().hotspots.len(), 1);
        assert_eq!(editor.store().undo_len(), 1);
    }

    #[test]
    fn test_edit_hotspot_properties() {
        let mut editor = editor();
        editor
            .add_hotspot(Hotspot::rect("r", Rect { x: 0.0, y: 0.0, w: 0.25, h: 0.25 }))
            .unwrap();
        editor
            .edit_hotspot("r", |h| h.tooltip = Some("Door".to_string()))
            .unwrap();
        assert_eq!(hotspot(&editor, 0).tooltip.as_deref(), Some("Door"));

        let err = editor.edit_hotspot("r", |h| h.visible_if = Some("a and".to_string()));
        assert!(matches!(err, Err(EditorError::Validation(_))));
        assert!(hotspot(&editor, 0).visible_if.is_none());
        assert!(matches!(
            editor.edit_hotspot("missing", |h| h.hidden = true),
            Err(EditorError::UnknownHotspot(_))
        ));

        assert!(editor.undo());
        assert!(hotspot(&editor, 0).tooltip.is_none());
    }

    #[test]
    fn test_image_cache_uses_configured_budget() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = Scene::new("room");
        for name in ["a.png", "b.png"] {
            // 4x4 RGBA is 64 bytes.
            image::RgbaImage::new(4, 4).save(dir.path().join(name)).unwrap();
            scene.layers.push(Layer {
                id: name.to_string(),
                fill: LayerFill::Image { image: name.to_string() },
                alpha: 1.0,
                zorder: 0,
                enter_transition: None,
                exit_transition: None,
            });
        }

        let config = EditorConfig {
            image_cache_bytes: 64,
            ..EditorConfig::default()
        };
        let mut editor = SceneEditor::new(config).unwrap();
        assert_eq!(editor.images().max_bytes(), 64);
        assert!(matches!(
            editor.preload_active_scene(dir.path()),
            Err(EditorError::NoActiveScene)
        ));

        editor.load(SceneProject::empty().with_scene(scene)).unwrap();
        assert_eq!(editor.preload_active_scene(dir.path()).unwrap(), 2);
        // Only one image fits the budget.
        assert_eq!(editor.images().len(), 1);
        assert_eq!(editor.images().total_bytes(), 64);

        editor.load(SceneProject::empty()).unwrap();
        assert!(editor.images().is_empty());
    }

    #[test]
    fn test_coords_mode_switch_is_undoable() {
        let mut editor = editor();
        editor
            .add_hotspot(Hotspot::rect("r", Rect { x: 0.25, y: 0.5, w: 0.25, h: 0.25 }))
            .unwrap();
        editor.set_coords_mode(CoordsMode::Absolute).unwrap();
        let Geometry::Rect { rect } = &hotspot(&editor, 0).geometry else {
            panic!("expected rect");
        };
        assert_eq!((rect.x, rect.y), (25.0, 50.0));

        // Same pixel, same hit after conversion.
        let hit = editor.pointer_down(30.0, 60.0).unwrap().unwrap();
        assert_eq!(hit.kind, HitKind::Move);
        editor.pointer_up();

        assert!(editor.undo());
        assert_eq!(editor.project().coords_mode(), CoordsMode::Relative);
    }

    #[test]
    fn test_scene_switching_and_removal() {
        let mut editor = editor();
        editor.add_scene(Scene::new("hall")).unwrap();
        assert_eq!(editor.active_scene().unwrap().id, "hall");
        assert!(matches!(
            editor.select_scene("attic"),
            Err(EditorError::UnknownScene(_))
        ));

        editor
            .add_hotspot(Hotspot::rect("exit", Rect { x: 0.0, y: 0.0, w: 0.25, h: 0.25 }))
            .unwrap();
        editor.remove_hotspot("exit").unwrap();
        assert!(matches!(
            editor.remove_hotspot("exit"),
            Err(EditorError::UnknownHotspot(_))
        ));

        // Undo back past the scene creation; the editor falls back to the first scene.
        while editor.undo() {}
        assert_eq!(editor.active_scene().unwrap().id, "room");
        editor.select_scene("room").unwrap();
    }
}
