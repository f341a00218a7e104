use std::ops::{Add, Sub};

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::component::Component;

/// Sub-unit position of a rotated terminal in canvas space
pub type TerminalPoint = Point2<f64>;

/// Integer position, in either view (screen) or model (canvas) space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to a terminal position
    pub fn distance_to(&self, other: &TerminalPoint) -> f64 {
        nalgebra::distance(&Point2::new(self.x as f64, self.y as f64), other)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Round each axis to the nearest multiple of `grid`, ties to even
pub fn snap_to_grid(p: Point, grid: i32) -> Point {
    if grid <= 0 {
        return p;
    }
    let snap = |v: i32| ((v as f64 / grid as f64).round_ties_even() as i32) * grid;
    Point::new(snap(p.x), snap(p.y))
}

/// Terminal positions of `component` after rotation about its centre
pub fn terminal_positions(component: &Component) -> Vec<TerminalPoint> {
    let rotation = Rotation2::new(f64::from(component.rotation).to_radians());
    let centre = Point2::new(component.x as f64, component.y as f64);

    component
        .terminals
        .iter()
        .map(|&(dx, dy)| centre + rotation * Vector2::new(dx as f64, dy as f64))
        .collect()
}

/// Pan/zoom transform between view space and model space.
///
/// `model = (view - pan) / zoom` and `view = model * zoom + pan`; results are
/// truncated to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            zoom: 1.0,
            pan: Point::default(),
            min_zoom: 0.2,
            max_zoom: 3.0,
        }
    }
}

impl Viewport {
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Viewport {
            min_zoom,
            max_zoom,
            ..Viewport::default()
        }
    }

    pub fn to_model(&self, view: Point) -> Point {
        Point::new(
            ((view.x - self.pan.x) as f64 / self.zoom) as i32,
            ((view.y - self.pan.y) as f64 / self.zoom) as i32,
        )
    }

    pub fn to_view(&self, model: Point) -> Point {
        Point::new(
            (model.x as f64 * self.zoom + self.pan.x as f64) as i32,
            (model.y as f64 * self.zoom + self.pan.y as f64) as i32,
        )
    }

    /// Multiply the zoom by `factor` (clamped). With a `center`, the pan is
    /// recomputed so the view point under it stays fixed.
    pub fn zoom_about(&mut self, factor: f64, center: Option<Point>) {
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);

        if let Some(c) = center {
            if self.zoom != old_zoom {
                let scale = self.zoom / old_zoom;
                self.pan = Point::new(
                    (c.x as f64 - (c.x - self.pan.x) as f64 * scale) as i32,
                    (c.y as f64 - (c.y - self.pan.y) as f64 * scale) as i32,
                );
            }
        }
    }

    /// Shift the view by a view-space delta (middle-button drag)
    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    /// Frame every component centre, with a margin, in a `width` x `height`
    /// view. Zoom is capped at `max_fit_zoom` but not clamped to the zoom range.
    pub fn fit_to(&mut self, components: &[Component], width: u32, height: u32, margin: i32, max_fit_zoom: f64) {
        let (Some(min_x), Some(max_x)) = (
            components.iter().map(|c| c.x).min(),
            components.iter().map(|c| c.x).max(),
        ) else {
            return;
        };
        let (Some(min_y), Some(max_y)) = (
            components.iter().map(|c| c.y).min(),
            components.iter().map(|c| c.y).max(),
        ) else {
            return;
        };

        let min_x = (min_x - margin) as f64;
        let min_y = (min_y - margin) as f64;
        let box_w = (max_x + margin) as f64 - min_x;
        let box_h = (max_y + margin) as f64 - min_y;
        if box_w <= 0.0 || box_h <= 0.0 {
            return;
        }

        let width = width as f64;
        let height = height as f64;
        self.zoom = (width / box_w).min(height / box_h).min(max_fit_zoom);
        self.pan = Point::new(
            (width / 2.0 - (min_x + box_w / 2.0) * self.zoom) as i32,
            (height / 2.0 - (min_y + box_h / 2.0) * self.zoom) as i32,
        );
    }
}
