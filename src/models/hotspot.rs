// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hotspot data structures.
//!
//! This module defines the interactive regions of a scene: their geometry
//! (rectangle, polygon or circle), visibility conditions and the navigation
//! action they trigger.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::project::Transition;

/// A 2D point. Stored in documents as an `[x, y]` pair.
///
/// The same type carries project-space values (interpreted under the
/// project's coordinate mode) and canvas pixel positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint of the segment between `self` and `other`.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Axis-aligned rectangle given by its origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Circle given by its centre and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

/// Shape tag of a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Polygon,
    Circle,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Circle => "circle",
        })
    }
}

/// Hotspot geometry.
///
/// On the wire this is the `shape` tag plus exactly one of the `rect`,
/// `points` or `circle` fields; here the tag and its field are one value, so
/// a hotspot can never carry geometry that disagrees with its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Geometry {
    Rect { rect: Rect },
    Polygon { points: Vec<Point> },
    Circle { circle: Circle },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Rect { .. } => ShapeKind::Rect,
            Geometry::Polygon { .. } => ShapeKind::Polygon,
            Geometry::Circle { .. } => ShapeKind::Circle,
        }
    }
}

/// Navigation action triggered by a hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    GoScene {
        scene_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transition: Option<Transition>,
    },
    JumpLabel {
        label: String,
    },
    CallLabel {
        label: String,
    },
    CallScreen {
        screen: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Map<String, Value>>,
    },
    Function {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Map<String, Value>>,
    },
}

/// An interactive region over a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_effect: Option<Map<String, Value>>,
    /// Condition expression controlling visibility at runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<String>,
    /// Condition expression controlling whether the action can fire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_if: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Hotspot {
    /// Create a visible hotspot with the given geometry and no action.
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            hidden: false,
            tooltip: None,
            hover_effect: None,
            visible_if: None,
            enabled_if: None,
            action: None,
        }
    }

    pub fn rect(id: impl Into<String>, rect: Rect) -> Self {
        Self::new(id, Geometry::Rect { rect })
    }

    pub fn polygon(id: impl Into<String>, points: Vec<Point>) -> Self {
        Self::new(id, Geometry::Polygon { points })
    }

    pub fn circle(id: impl Into<String>, circle: Circle) -> Self {
        Self::new(id, Geometry::Circle { circle })
    }

    pub fn shape(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Polygon vertices, or `None` for other shapes.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.geometry {
            Geometry::Polygon { points } => Some(points),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hotspot_wire_format() {
        let mut hotspot = Hotspot::rect("door", Rect { x: 0.1, y: 0.2, w: 0.3, h: 0.4 });
        hotspot.action = Some(Action::GoScene {
            scene_id: "hall".to_string(),
            transition: None,
        });

        let value = serde_json::to_value(&hotspot).unwrap();
        assert_eq!(value["shape"], "rect");
        assert_eq!(value["rect"]["w"], 0.3);
        assert_eq!(value["action"]["type"], "go_scene");
        assert_eq!(value["action"]["scene_id"], "hall");
        assert!(value.get("tooltip").is_none());
    }

    #[test]
    fn test_polygon_points_are_pairs() {
        let value = json!({
            "id": "p",
            "shape": "polygon",
            "points": [[0, 0], [0.2, 0], [0, 0.2]]
        });
        let hotspot: Hotspot = serde_json::from_value(value).unwrap();
        assert_eq!(hotspot.shape(), ShapeKind::Polygon);
        assert_eq!(hotspot.points().unwrap()[1], Point::new(0.2, 0.0));
        assert!(!hotspot.hidden);
    }

    #[test]
    fn test_action_variants() {
        let action: Action = serde_json::from_value(json!({
            "type": "call_screen",
            "screen": "inventory",
            "params": { "tab": 2 }
        }))
        .unwrap();
        match action {
            Action::CallScreen { screen, params } => {
                assert_eq!(screen, "inventory");
                assert_eq!(params.unwrap()["tab"], 2);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_point_helpers() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(a.midpoint(&b), Point::new(1.5, 2.0));
    }
}
