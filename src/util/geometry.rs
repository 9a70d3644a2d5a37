// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate transformations between project space and canvas pixels.
//!
//! Project values are either fractions of the reference resolution
//! (`relative`) or reference-resolution units (`absolute`). Canvas values
//! are pixels of whatever surface the editor draws on. Values written back
//! into the project are rounded to three decimals so repeated edits do not
//! accumulate floating point noise in saved files.

use crate::models::hotspot::{Geometry, Point};
use crate::models::project::{CoordsMode, ProjectSettings, SceneProject};

/// Conversion was asked to divide by an unusable size.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("degenerate {axis} size {value}: sizes must be finite and greater than zero")]
    DegenerateSize { axis: &'static str, value: f64 },
}

/// Scaled values are snapped to this grid before rounding, so results a
/// few ulps either side of a tie round the same way.
const SNAP: f64 = 1e6;

/// Round to three decimal places. Ties round toward positive infinity.
pub fn round3(value: f64) -> f64 {
    let scaled = value * 1000.0;
    let snapped = if scaled.abs() < 1e9 {
        (scaled * SNAP).round() / SNAP
    } else {
        scaled
    };
    (snapped + 0.5).floor() / 1000.0
}

fn check_size(axis: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::DegenerateSize { axis, value })
    }
}

fn to_canvas(mode: CoordsMode, value: f64, canvas_size: f64, ref_size: f64) -> f64 {
    match mode {
        CoordsMode::Relative => value * canvas_size,
        CoordsMode::Absolute => value * (canvas_size / ref_size),
    }
}

fn to_project(mode: CoordsMode, value: f64, canvas_size: f64, ref_size: f64) -> f64 {
    let raw = match mode {
        CoordsMode::Relative => value / canvas_size,
        CoordsMode::Absolute => value / (canvas_size / ref_size),
    };
    round3(raw)
}

/// Convert a project-space scalar to canvas pixels.
pub fn scalar_to_canvas(
    mode: CoordsMode,
    value: f64,
    canvas_size: f64,
    ref_size: f64,
) -> Result<f64, GeometryError> {
    let canvas_size = check_size("canvas", canvas_size)?;
    let ref_size = check_size("reference", ref_size)?;
    Ok(to_canvas(mode, value, canvas_size, ref_size))
}

/// Convert canvas pixels to a project-space scalar, rounded with [`round3`].
pub fn scalar_to_project(
    mode: CoordsMode,
    value: f64,
    canvas_size: f64,
    ref_size: f64,
) -> Result<f64, GeometryError> {
    let canvas_size = check_size("canvas", canvas_size)?;
    let ref_size = check_size("reference", ref_size)?;
    Ok(to_project(mode, value, canvas_size, ref_size))
}

/// A project's coordinate space mapped onto a canvas of a given pixel size.
///
/// All sizes are checked once on construction, so every conversion made
/// through a viewport is infallible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    mode: CoordsMode,
    ref_width: f64,
    ref_height: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    pub fn new(project: &SceneProject, canvas_width: f64, canvas_height: f64) -> Result<Self, GeometryError> {
        Self::from_settings(&project.project, canvas_width, canvas_height)
    }

    pub fn from_settings(
        settings: &ProjectSettings,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Result<Self, GeometryError> {
        let reference = settings.reference_resolution;
        Ok(Self {
            mode: settings.coords_mode,
            ref_width: check_size("reference width", f64::from(reference.width))?,
            ref_height: check_size("reference height", f64::from(reference.height))?,
            canvas_width: check_size("canvas width", canvas_width)?,
            canvas_height: check_size("canvas height", canvas_height)?,
        })
    }

    pub fn mode(&self) -> CoordsMode {
        self.mode
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn x_to_canvas(&self, value: f64) -> f64 {
        to_canvas(self.mode, value, self.canvas_width, self.ref_width)
    }

    pub fn y_to_canvas(&self, value: f64) -> f64 {
        to_canvas(self.mode, value, self.canvas_height, self.ref_height)
    }

    pub fn x_to_project(&self, value: f64) -> f64 {
        to_project(self.mode, value, self.canvas_width, self.ref_width)
    }

    pub fn y_to_project(&self, value: f64) -> f64 {
        to_project(self.mode, value, self.canvas_height, self.ref_height)
    }

    /// Project point to canvas pixels, x against width and y against height.
    pub fn point_to_canvas(&self, point: Point) -> Point {
        Point::new(self.x_to_canvas(point.x), self.y_to_canvas(point.y))
    }

    /// Canvas pixel position to a rounded project point.
    pub fn point_to_project(&self, point: Point) -> Point {
        Point::new(self.x_to_project(point.x), self.y_to_project(point.y))
    }
}

/// Rewrite every hotspot of `document` into `mode`.
///
/// Converting to the current mode returns an unchanged copy. Otherwise x,
/// w, cx and polygon x values scale by the reference width, y, h, cy and
/// polygon y values by the reference height, and radii by the reference
/// width. Every converted value is rounded with [`round3`].
pub fn convert_mode(document: &SceneProject, mode: CoordsMode) -> Result<SceneProject, GeometryError> {
    if document.project.coords_mode == mode {
        return Ok(document.clone());
    }

    let reference = document.project.reference_resolution;
    let width = check_size("reference width", f64::from(reference.width))?;
    let height = check_size("reference height", f64::from(reference.height))?;
    let scale = |value: f64, size: f64| match mode {
        CoordsMode::Absolute => round3(value * size),
        CoordsMode::Relative => round3(value / size),
    };
    let scale_x = |value: f64| scale(value, width);
    let scale_y = |value: f64| scale(value, height);

    let mut next = document.clone();
    next.project.coords_mode = mode;
    for scene in &mut next.scenes {
        for hotspot in &mut scene.hotspots {
            match &mut hotspot.geometry {
                Geometry::Rect { rect } => {
                    rect.x = scale_x(rect.x);
                    rect.y = scale_y(rect.y);
                    rect.w = scale_x(rect.w);
                    rect.h = scale_y(rect.h);
                }
                Geometry::Polygon { points } => {
                    for point in points.iter_mut() {
                        *point = Point::new(scale_x(point.x), scale_y(point.y));
                    }
                }
                Geometry::Circle { circle } => {
                    circle.cx = scale_x(circle.cx);
                    circle.cy = scale_y(circle.cy);
                    circle.r = scale_x(circle.r);
                }
            }
        }
    }

    log::debug!(
        "Converted {} scene(s) from {} to {} coordinates",
        next.scenes.len(),
        document.project.coords_mode,
        mode
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hotspot::{Circle, Hotspot, Rect};
    use crate::models::project::{ReferenceResolution, Scene};

    fn project(width: u32, height: u32, mode: CoordsMode) -> SceneProject {
        let mut project = SceneProject::empty();
        project.project.reference_resolution = ReferenceResolution { width, height };
        project.project.coords_mode = mode;
        project
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(scalar_to_canvas(CoordsMode::Relative, 0.5, 200.0, 100.0).unwrap(), 100.0);
        assert_eq!(scalar_to_project(CoordsMode::Relative, 100.0, 200.0, 100.0).unwrap(), 0.5);
        assert_eq!(scalar_to_canvas(CoordsMode::Absolute, 50.0, 200.0, 100.0).unwrap(), 100.0);
        assert_eq!(scalar_to_project(CoordsMode::Absolute, 100.0, 200.0, 100.0).unwrap(), 50.0);
    }

    #[test]
    fn test_scalar_roundtrip_rounds_to_three_decimals() {
        let canvases = [97.0, 333.0, 540.0, 960.0, 1013.0];
        let references = [7.0, 100.0, 1080.0, 1920.0];
        let mut checked = 0;
        for mode in [CoordsMode::Relative, CoordsMode::Absolute] {
            for step in [0.0137, 0.0005, 0.123456] {
                for k in -2000..2000 {
                    let value = f64::from(k) * step;
                    for canvas in canvases {
                        for reference in references {
                            let px = scalar_to_canvas(mode, value, canvas, reference).unwrap();
                            let back = scalar_to_project(mode, px, canvas, reference).unwrap();
                            assert_eq!(back, round3(value), "{mode} v={value} C={canvas} R={reference}");
                            checked += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(checked, 2 * 3 * 4000 * 5 * 4);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(0.1235), 0.124);
        assert_eq!(round3(30.000000000000004), 30.0);
        assert_eq!(round3(-27.0575), -27.057);
        assert_eq!(round3(2.0005), 2.001);
    }

    #[test]
    fn test_round3_ties_go_up() {
        assert_eq!(round3(0.0005), 0.001);
        assert_eq!(round3(-0.0005), 0.0);
        assert_eq!(round3(-1.2345), -1.234);
        assert_eq!(round3(-1.2346), -1.235);
    }

    #[test]
    fn test_degenerate_sizes_are_reported() {
        assert!(matches!(
            scalar_to_canvas(CoordsMode::Absolute, 1.0, 100.0, 0.0),
            Err(GeometryError::DegenerateSize { .. })
        ));
        assert!(scalar_to_project(CoordsMode::Relative, 1.0, 0.0, 100.0).is_err());
        assert!(scalar_to_project(CoordsMode::Relative, 1.0, f64::NAN, 100.0).is_err());
        assert!(Viewport::new(&project(0, 100, CoordsMode::Relative), 100.0, 100.0).is_err());
        assert!(Viewport::new(&project(100, 100, CoordsMode::Relative), -5.0, 100.0).is_err());
    }

    #[test]
    fn test_viewport_points() {
        let view = Viewport::new(&project(100, 100, CoordsMode::Relative), 200.0, 200.0).unwrap();
        assert_eq!(view.point_to_canvas(Point::new(0.5, 0.25)), Point::new(100.0, 50.0));
        assert_eq!(view.point_to_project(Point::new(100.0, 50.0)), Point::new(0.5, 0.25));

        let view = Viewport::new(&project(1920, 1080, CoordsMode::Absolute), 960.0, 540.0).unwrap();
        assert_eq!(view.point_to_canvas(Point::new(1920.0, 1080.0)), Point::new(960.0, 540.0));
        assert_eq!(view.point_to_project(Point::new(480.0, 270.0)), Point::new(960.0, 540.0));
    }

    #[test]
    fn test_convert_mode_roundtrip() {
        let mut source = project(100, 50, CoordsMode::Relative);
        let mut scene = Scene::new("s");
        scene.hotspots.push(Hotspot::rect("r", Rect { x: 0.1, y: 0.2, w: 0.3, h: 0.4 }));
        scene.hotspots.push(Hotspot::polygon(
            "p",
            vec![Point::new(0.0, 0.0), Point::new(0.123, 0.456), Point::new(0.9, 0.333)],
        ));
        let mut circle = Hotspot::circle("c", Circle { cx: 0.5, cy: 0.5, r: 0.1 });
        circle.tooltip = Some("keep me".to_string());
        scene.hotspots.push(circle);
        source.scenes.push(scene);

        let absolute = convert_mode(&source, CoordsMode::Absolute).unwrap();
        assert_eq!(absolute.coords_mode(), CoordsMode::Absolute);
        match &absolute.scenes[0].hotspots[0].geometry {
            Geometry::Rect { rect } => {
                assert_eq!(rect.w, 30.0);
                assert_eq!(rect.h, 20.0);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        match &absolute.scenes[0].hotspots[2].geometry {
            Geometry::Circle { circle } => {
                assert_eq!(circle.cy, 25.0);
                assert_eq!(circle.r, 10.0);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        assert_eq!(absolute.scenes[0].hotspots[2].tooltip.as_deref(), Some("keep me"));

        let back = convert_mode(&absolute, CoordsMode::Relative).unwrap();
        assert_eq!(back.coords_mode(), CoordsMode::Relative);
        for (original, converted) in source.scenes[0].hotspots.iter().zip(&back.scenes[0].hotspots) {
            let a = serde_json::to_value(&original.geometry).unwrap();
            let b = serde_json::to_value(&converted.geometry).unwrap();
            assert_close(&a, &b);
        }
    }

    #[test]
    fn test_convert_to_same_mode_is_noop() {
        let mut source = project(100, 100, CoordsMode::Absolute);
        source.scenes.push(Scene::new("s"));
        let converted = convert_mode(&source, CoordsMode::Absolute).unwrap();
        assert_eq!(converted, source);
    }

    fn assert_close(a: &serde_json::Value, b: &serde_json::Value) {
        use serde_json::Value;
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                let (x, y) = (x.as_f64().unwrap(), y.as_f64().unwrap());
                assert!((x - y).abs() <= 0.001, "{x} vs {y}");
            }
            (Value::Array(xs), Value::Array(ys)) => {
                assert_eq!(xs.len(), ys.len());
                xs.iter().zip(ys).for_each(|(x, y)| assert_close(x, y));
            }
            (Value::Object(xs), Value::Object(ys)) => {
                assert_eq!(xs.len(), ys.len());
                for (key, x) in xs {
                    assert_close(x, &ys[key]);
                }
            }
            _ => assert_eq!(a, b),
        }
    }
}
