//! Points and footprints in world space.
//!
//! The vertical axis is `y`. Horizontal probing rotates around it, starting
//! from `+z` and turning toward `+x`.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Cartesian coordinates of a node or probe.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Same position at a different height.
    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Horizontal unit vector rotated `degrees` around the vertical axis.
    ///
    /// Zero degrees is `+z`; ninety degrees is `+x`.
    pub fn heading(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self::new(radians.sin(), 0.0, radians.cos())
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[f64; 3]> for Position {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

/// Half-sizes of a node's bounding box along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Extents {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Horizontal distance a neighbour probe travels from the node centre.
    pub fn probe_reach(&self) -> f64 {
        self.x * 2.0
    }

    /// Fixed cost of one step between adjacent nodes.
    pub fn step_distance(&self) -> f64 {
        self.z * 2.0
    }

    /// Radius of the smallest circle enclosing the horizontal footprint.
    pub fn horizontal_radius(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Whether the horizontal offset `(dx, dz)` from the centre falls inside
    /// the footprint.
    pub fn contains_horizontal(&self, dx: f64, dz: f64) -> bool {
        dx.abs() <= self.x + FOOTPRINT_TOLERANCE && dz.abs() <= self.z + FOOTPRINT_TOLERANCE
    }
}

impl From<[f64; 3]> for Extents {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

/// Slack applied to footprint edges so probes landing exactly on a shared
/// border still register.
const FOOTPRINT_TOLERANCE: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn heading_rotates_from_forward_toward_right() {
        let forward = Position::heading(0.0);
        assert!(approx(forward.x, 0.0) && approx(forward.z, 1.0));

        let right = Position::heading(90.0);
        assert!(approx(right.x, 1.0) && approx(right.z, 0.0));

        let diagonal = Position::heading(45.0);
        assert!(approx(diagonal.x, diagonal.z));
        assert!(approx(diagonal.distance_to(&Position::ORIGIN), 1.0));
    }

    #[test]
    fn offsets_and_height_changes_keep_other_axes() {
        let p = Position::new(1.0, 2.0, 3.0);
        assert_eq!(p.with_y(7.5), Position::new(1.0, 7.5, 3.0));

        let stepped = p + Position::heading(90.0).scale(2.0);
        assert!(approx(stepped.x, 3.0) && approx(stepped.y, 2.0) && approx(stepped.z, 3.0));
        assert!(approx(p.distance_to(&Position::new(4.0, 6.0, 3.0)), 5.0));
    }

    #[test]
    fn extents_derive_reach_and_step() {
        let extents = Extents::new(0.5, 0.1, 0.75);
        assert!(approx(extents.probe_reach(), 1.0));
        assert!(approx(extents.step_distance(), 1.5));
        assert!(extents.contains_horizontal(0.5, -0.75));
        assert!(!extents.contains_horizontal(0.51, 0.0));
    }
}
