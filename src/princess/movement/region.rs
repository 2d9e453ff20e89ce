//! Convex bounding region over a set of hexes
//!
//! The region is the intersection of three slabs, one per cube axis
//! (q, r, s). That is always convex on a hex grid, cheap to build and
//! answers containment and distance in constant time.

use serde::{Deserialize, Serialize};

use crate::board::HexCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvexRegion {
    min_q: i32,
    max_q: i32,
    min_r: i32,
    max_r: i32,
    min_s: i32,
    max_s: i32,
}

impl ConvexRegion {
    /// Smallest region containing every coordinate, or `None` for no input
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a HexCoord>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut region = Self::point(*first);
        for coord in iter {
            region.include(*coord);
        }
        Some(region)
    }

    pub fn point(coord: HexCoord) -> Self {
        Self {
            min_q: coord.q,
            max_q: coord.q,
            min_r: coord.r,
            max_r: coord.r,
            min_s: coord.s(),
            max_s: coord.s(),
        }
    }

    /// Every hex within `radius` of `center`
    pub fn around(center: HexCoord, radius: u32) -> Self {
        let radius = radius as i32;
        Self {
            min_q: center.q - radius,
            max_q: center.q + radius,
            min_r: center.r - radius,
            max_r: center.r + radius,
            min_s: center.s() - radius,
            max_s: center.s() + radius,
        }
    }

    pub fn include(&mut self, coord: HexCoord) {
        self.min_q = self.min_q.min(coord.q);
        self.max_q = self.max_q.max(coord.q);
        self.min_r = self.min_r.min(coord.r);
        self.max_r = self.max_r.max(coord.r);
        self.min_s = self.min_s.min(coord.s());
        self.max_s = self.max_s.max(coord.s());
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        (self.min_q..=self.max_q).contains(&coord.q)
            && (self.min_r..=self.max_r).contains(&coord.r)
            && (self.min_s..=self.max_s).contains(&coord.s())
    }

    /// Lower bound on the hex distance from `coord` to any hex in the region
    ///
    /// Exact when the region is a single hex or a hex ball; never larger
    /// than the true distance, so it is safe for ruling interactions out.
    pub fn distance_to(&self, coord: HexCoord) -> u32 {
        let gap = |value: i32, min: i32, max: i32| (min - value).max(value - max).max(0);
        let dq = gap(coord.q, self.min_q, self.max_q);
        let dr = gap(coord.r, self.min_r, self.max_r);
        let ds = gap(coord.s(), self.min_s, self.max_s);
        dq.max(dr).max(ds) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_every_source_hex() {
        let coords = vec![HexCoord::new(2, 3), HexCoord::new(5, 1), HexCoord::new(4, 6)];
        let region = ConvexRegion::from_coords(&coords).unwrap();
        for coord in &coords {
            assert!(region.contains(*coord));
            assert_eq!(region.distance_to(*coord), 0);
        }
    }

    #[test]
    fn test_empty_input() {
        let coords: Vec<HexCoord> = Vec::new();
        assert!(ConvexRegion::from_coords(&coords).is_none());
    }

    #[test]
    fn test_ball_distance_is_exact() {
        let center = HexCoord::new(10, 10);
        let region = ConvexRegion::around(center, 3);
        for coord in center.hexes_in_range(6) {
            let expected = center.distance(&coord).saturating_sub(3);
            assert_eq!(region.distance_to(coord), expected, "{:?}", coord);
        }
    }

    #[test]
    fn test_distance_never_overestimates() {
        let coords = vec![HexCoord::new(0, 0), HexCoord::new(4, 0), HexCoord::new(0, 4)];
        let region = ConvexRegion::from_coords(&coords).unwrap();
        for point in HexCoord::new(2, 2).hexes_in_range(8) {
            let nearest = coords.iter().map(|c| c.distance(&point)).min().unwrap();
            assert!(region.distance_to(point) <= nearest);
        }
    }
}
