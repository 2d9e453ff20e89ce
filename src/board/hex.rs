//! Hex coordinate system for the game board (axial coordinates)
//!
//! Uses axial coordinates (q, r) for easy neighbor calculation. Angles are
//! measured counter-clockwise from East in pointy-top pixel space.

use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const ARC_EPSILON: f64 = 1e-6;

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate S (derived from q and r)
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Manhattan distance in hex space
    pub fn distance(&self, other: &Self) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get all 6 neighboring hex coordinates, in `Facing::all()` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        Facing::all().map(|facing| self.neighbor(facing))
    }

    /// The adjacent hex across the given hexside
    pub fn neighbor(&self, facing: Facing) -> HexCoord {
        let offset = facing.offset();
        HexCoord::new(self.q + offset.q, self.r + offset.r)
    }

    /// Center of this hex in pixel space (unit hex size, y pointing up)
    pub fn to_pixel(&self) -> (f64, f64) {
        let x = SQRT_3 * (self.q as f64 + self.r as f64 / 2.0);
        let y = -1.5 * self.r as f64;
        (x, y)
    }

    /// Bearing to another hex in degrees, in `0.0..360.0`
    ///
    /// Returns 0.0 for the same hex.
    pub fn bearing_to(&self, other: &Self) -> f64 {
        let (x0, y0) = self.to_pixel();
        let (x1, y1) = other.to_pixel();
        let angle = (y1 - y0).atan2(x1 - x0).to_degrees();
        angle.rem_euclid(360.0)
    }

    /// Get hex coordinates in a line from self to other (inclusive)
    pub fn line_to(&self, other: &Self) -> Vec<HexCoord> {
        let n = self.distance(other) as i32;
        if n == 0 {
            return vec![*self];
        }

        let mut results = Vec::with_capacity((n + 1) as usize);
        for i in 0..=n {
            let t = i as f64 / n as f64;
            // Nudge off exact hex edges so ties resolve consistently
            let q = self.q as f64 + (other.q - self.q) as f64 * t + 1e-6;
            let r = self.r as f64 + (other.r - self.r) as f64 * t + 1e-6;
            results.push(Self::round(q, r));
        }
        results
    }

    /// Round floating point hex to nearest integer hex
    fn round(q: f64, r: f64) -> Self {
        let s = -q - r;
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }

    /// Get all hexes within range (inclusive)
    pub fn hexes_in_range(&self, range: u32) -> Vec<HexCoord> {
        let range = range as i32;
        let mut results = Vec::new();
        for q in -range..=range {
            for r in (-range).max(-q - range)..=range.min(-q + range) {
                results.push(HexCoord::new(self.q + q, self.r + r));
            }
        }
        results
    }
}

/// Facing of a unit, named for the hexside it points through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    #[default]
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl Facing {
    /// Get the hex offset for this direction
    pub fn offset(&self) -> HexCoord {
        match self {
            Facing::East => HexCoord::new(1, 0),
            Facing::NorthEast => HexCoord::new(1, -1),
            Facing::NorthWest => HexCoord::new(0, -1),
            Facing::West => HexCoord::new(-1, 0),
            Facing::SouthWest => HexCoord::new(-1, 1),
            Facing::SouthEast => HexCoord::new(0, 1),
        }
    }

    /// Index in counter-clockwise order starting at East
    pub fn index(&self) -> usize {
        match self {
            Facing::East => 0,
            Facing::NorthEast => 1,
            Facing::NorthWest => 2,
            Facing::West => 3,
            Facing::SouthWest => 4,
            Facing::SouthEast => 5,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::all()[index % 6]
    }

    /// Angle of this facing in degrees
    pub fn angle_degrees(&self) -> f64 {
        self.index() as f64 * 60.0
    }

    /// Rotate one hexside counter-clockwise
    pub fn rotate_left(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate one hexside clockwise
    pub fn rotate_right(&self) -> Self {
        Self::from_index(self.index() + 5)
    }

    /// Get opposite direction
    pub fn opposite(&self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Number of hexside turns between two facings (0..=3)
    pub fn turns_to(&self, other: Facing) -> u32 {
        let diff = (other.index() + 6 - self.index()) % 6;
        diff.min(6 - diff) as u32
    }

    /// Facing whose direction is closest to the given bearing
    pub fn closest_to_bearing(bearing: f64) -> Self {
        let index = (bearing.rem_euclid(360.0) / 60.0).round() as usize;
        Self::from_index(index)
    }

    /// Which arc of a unit facing this way contains the given bearing
    pub fn arc_of_bearing(&self, bearing: f64) -> Arc {
        let mut rel = (bearing - self.angle_degrees()).rem_euclid(360.0);
        if rel > 180.0 {
            rel -= 360.0;
        }
        if rel.abs() <= 60.0 + ARC_EPSILON {
            Arc::Front
        } else if rel.abs() > 120.0 + ARC_EPSILON {
            Arc::Rear
        } else if rel > 0.0 {
            Arc::Left
        } else {
            Arc::Right
        }
    }

    /// Which arc of a unit at `from` facing this way contains `to`
    ///
    /// The unit's own hex counts as front.
    pub fn arc_to(&self, from: HexCoord, to: HexCoord) -> Arc {
        if from == to {
            return Arc::Front;
        }
        self.arc_of_bearing(from.bearing_to(&to))
    }

    /// All directions
    pub fn all() -> [Facing; 6] {
        [
            Facing::East,
            Facing::NorthEast,
            Facing::NorthWest,
            Facing::West,
            Facing::SouthWest,
            Facing::SouthEast,
        ]
    }
}

/// Firing and hit-location arcs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arc {
    Front,
    Left,
    Right,
    Rear,
}
