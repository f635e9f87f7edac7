//! Plane geometry shared by the gesture recognizer and the drawing engine.

use std::ops::{Add, Sub};

use serde::Serialize;

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point (or offset) in overlay space, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
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

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Angle of the vector `b - a` from the positive x-axis, in degrees.
///
/// The result lies in `(-180, 180]`. Coincident points yield `0.0`.
#[must_use]
pub fn angle_degrees(a: Point, b: Point) -> f64 {
    let deg = (b.y - a.y).atan2(b.x - a.x).to_degrees();
    if deg <= -180.0 { deg + 360.0 } else { deg }
}

/// Wrap an angle difference into `(-180, 180]`.
#[must_use]
pub fn wrap_degrees(deg: f64) -> f64 {
    let d = deg % 360.0;
    if d > 180.0 {
        d - 360.0
    } else if d <= -180.0 {
        d + 360.0
    } else {
        d
    }
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + ab.x * t, a.y + ab.y * t))
}
