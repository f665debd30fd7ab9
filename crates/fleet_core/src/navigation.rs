//! Plane geometry in compass terms: 0° is north (+y), 90° is east (+x).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Range and bearing from one point to another.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompassVector {
    pub bearing: f64,
    pub range: f64,
}

impl CompassVector {
    pub fn new(bearing: f64, range: f64) -> Self {
        Self {
            bearing: normalize_bearing(bearing),
            range,
        }
    }

    pub fn between(from: Point, to: Point) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        Self::new(dx.atan2(dy).to_degrees(), dx.hypot(dy))
    }

    /// Cartesian offset `(dx, dy)` covered by this vector.
    pub fn displacement(self) -> (f64, f64) {
        let radians = self.bearing.to_radians();
        (self.range * radians.sin(), self.range * radians.cos())
    }
}

impl Add<CompassVector> for Point {
    type Output = Point;

    fn add(self, vector: CompassVector) -> Point {
        let (dx, dy) = vector.displacement();
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Folds any angle in degrees into `[0, 360)`.
pub fn normalize_bearing(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

pub fn range_between(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Position reached after travelling `distance` along `course`.
pub fn advance(from: Point, course: f64, distance: f64) -> Point {
    from + CompassVector::new(course, distance)
}
