// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hit testing and editing of hotspot shapes.
//!
//! Everything here takes pointer positions in canvas pixels and reads or
//! writes project-space geometry through a [`Viewport`]. The mutators edit a
//! hotspot the caller owns (normally a copy taken out of the current
//! document) and silently ignore requests that do not fit the shape, such
//! as moving a vertex of a circle.

use crate::models::hotspot::{Geometry, Hotspot, Point};
use crate::models::project::Scene;
use crate::util::geometry::Viewport;

/// Pick radius in pixels for vertices, edge midpoints and the radius handle.
pub const HANDLE_TOLERANCE: f64 = 6.0;

/// Which part of a hotspot is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Shape body; dragging translates the whole shape.
    Move,
    /// Polygon vertex handle.
    Vertex(usize),
    /// Midpoint handle of the polygon edge starting at this vertex index.
    AddVertex(usize),
    /// Circle radius handle.
    Radius,
}

/// Result of hit testing a whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub hotspot_index: usize,
    pub kind: HitKind,
}

/// Crossing-number test of `point` against the closed loop `vertices`.
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    if vertices.is_empty() {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Hit test one hotspot with the default handle tolerance.
pub fn hit_test(view: &Viewport, hotspot: &Hotspot, px: f64, py: f64) -> Option<HitKind> {
    hit_test_within(view, hotspot, px, py, HANDLE_TOLERANCE)
}

/// Hit test one hotspot; handles are picked within `tolerance` pixels.
pub fn hit_test_within(
    view: &Viewport,
    hotspot: &Hotspot,
    px: f64,
    py: f64,
    tolerance: f64,
) -> Option<HitKind> {
    let pointer = Point::new(px, py);
    match &hotspot.geometry {
        Geometry::Rect { rect } => {
            let x = view.x_to_canvas(rect.x);
            let y = view.y_to_canvas(rect.y);
            let w = view.x_to_canvas(rect.w);
            let h = view.y_to_canvas(rect.h);
            (px >= x && px <= x + w && py >= y && py <= y + h).then_some(HitKind::Move)
        }
        Geometry::Polygon { points } => {
            let pixels: Vec<Point> = points.iter().map(|p| view.point_to_canvas(*p)).collect();

            if let Some(i) = pixels.iter().position(|p| p.distance_to(&pointer) <= tolerance) {
                return Some(HitKind::Vertex(i));
            }

            let n = pixels.len();
            let edge = (0..n).find(|&i| {
                let mid = pixels[i].midpoint(&pixels[(i + 1) % n]);
                mid.distance_to(&pointer) <= tolerance
            });
            if let Some(i) = edge {
                return Some(HitKind::AddVertex(i));
            }

            point_in_polygon(pointer, &pixels).then_some(HitKind::Move)
        }
        Geometry::Circle { circle } => {
            let center = Point::new(view.x_to_canvas(circle.cx), view.y_to_canvas(circle.cy));
            let r = view.x_to_canvas(circle.r);
            let handle = Point::new(center.x + r, center.y);
            if handle.distance_to(&pointer) <= tolerance {
                Some(HitKind::Radius)
            } else if center.distance_to(&pointer) <= r {
                Some(HitKind::Move)
            } else {
                None
            }
        }
    }
}

/// Find the frontmost visible hotspot under the pointer.
///
/// Hotspots are drawn in list order, so the scan runs from the last one
/// back to the first. Hidden hotspots are skipped.
pub fn hit_test_scene(view: &Viewport, scene: &Scene, px: f64, py: f64, tolerance: f64) -> Option<Hit> {
    scene
        .hotspots
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, hotspot)| !hotspot.hidden)
        .find_map(|(i, hotspot)| {
            hit_test_within(view, hotspot, px, py, tolerance).map(|kind| Hit {
                hotspot_index: i,
                kind,
            })
        })
}

/// Move the whole shape by a pixel delta.
pub fn translate(hotspot: &mut Hotspot, view: &Viewport, dx: f64, dy: f64) {
    let dpx = view.x_to_project(dx);
    let dpy = view.y_to_project(dy);
    match &mut hotspot.geometry {
        Geometry::Rect { rect } => {
            rect.x += dpx;
            rect.y += dpy;
        }
        Geometry::Polygon { points } => {
            for point in points.iter_mut() {
                point.x += dpx;
                point.y += dpy;
            }
        }
        Geometry::Circle { circle } => {
            circle.cx += dpx;
            circle.cy += dpy;
        }
    }
}

/// Move polygon vertex `index` to the pixel position `(px, py)`.
pub fn move_vertex_to(hotspot: &mut Hotspot, view: &Viewport, index: usize, px: f64, py: f64) {
    if let Geometry::Polygon { points } = &mut hotspot.geometry {
        if let Some(vertex) = points.get_mut(index) {
            *vertex = view.point_to_project(Point::new(px, py));
        }
    }
}

/// Insert a polygon vertex at `(px, py)` right after vertex `after`.
pub fn insert_vertex(hotspot: &mut Hotspot, view: &Viewport, after: usize, px: f64, py: f64) {
    if let Geometry::Polygon { points } = &mut hotspot.geometry {
        if after < points.len() {
            points.insert(after + 1, view.point_to_project(Point::new(px, py)));
        }
    }
}

/// Set a circle's radius so its edge passes through `(px, py)`.
pub fn set_circle_radius(hotspot: &mut Hotspot, view: &Viewport, px: f64, py: f64) {
    if let Geometry::Circle { circle } = &mut hotspot.geometry {
        let center = Point::new(view.x_to_canvas(circle.cx), view.y_to_canvas(circle.cy));
        let radius = center.distance_to(&Point::new(px, py));
        circle.r = view.x_to_project(radius);
    }
}

/// What an active drag does on each pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Vertex(usize),
    Radius,
}

/// A pointer drag in progress on one hotspot.
///
/// Sessions start from a successful hit and end when the pointer is
/// released; the owner keeps at most one alive at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub hotspot_index: usize,
    pub mode: DragMode,
    pub last: Point,
}

impl DragSession {
    /// Start a drag from `hit` at pixel position `(px, py)`.
    ///
    /// An edge-midpoint hit inserts a new vertex into `hotspot` at the
    /// pointer and drags that vertex.
    pub fn start(hit: Hit, hotspot: &mut Hotspot, view: &Viewport, px: f64, py: f64) -> Self {
        let mode = match hit.kind {
            HitKind::Move => DragMode::Move,
            HitKind::Vertex(i) => DragMode::Vertex(i),
            HitKind::Radius => DragMode::Radius,
            HitKind::AddVertex(i) => {
                insert_vertex(hotspot, view, i, px, py);
                DragMode::Vertex(i + 1)
            }
        };
        Self {
            hotspot_index: hit.hotspot_index,
            mode,
            last: Point::new(px, py),
        }
    }

    /// Apply a pointer move to `hotspot` and remember the new position.
    pub fn apply(&mut self, hotspot: &mut Hotspot, view: &Viewport, px: f64, py: f64) {
        match self.mode {
            DragMode::Move => translate(hotspot, view, px - self.last.x, py - self.last.y),
            DragMode::Vertex(i) => move_vertex_to(hotspot, view, i, px, py),
            DragMode::Radius => set_circle_radius(hotspot, view, px, py),
        }
        self.last = Point::new(px, py);
    }
}
