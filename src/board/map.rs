//! Game board with hex grid, terrain, elevation and line of sight

use serde::{Deserialize, Serialize};

use crate::board::hex::HexCoord;
use crate::board::terrain::{Building, Terrain};

/// Woods modifier total at which line of sight is blocked
const WOODS_LOS_LIMIT: i32 = 3;

/// A single hex on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hex {
    pub coord: HexCoord,
    pub terrain: Terrain,
    pub elevation: i8,
    pub building: Option<Building>,
}

impl Hex {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            terrain,
            elevation: 0,
            building: None,
        }
    }

    /// Does this hex block line of sight when it lies between two others?
    pub fn blocks_los(&self) -> bool {
        self.terrain.blocks_los() || self.building.is_some()
    }
}

/// One of the four board edges, used for withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HomeEdge {
    #[default]
    North,
    South,
    East,
    West,
}

/// Result of tracing line of sight between two hexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineOfSight {
    pub blocked: bool,
    /// Sum of woods modifiers of intervening hexes
    pub intervening_woods: i32,
    /// Target is behind a one-level rise directly in front of it
    pub partial_cover: bool,
}

/// The full board, stored row-major (`r * width + q`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub width: u32,
    pub height: u32,
    hexes: Vec<Hex>,
}

impl Board {
    /// Create a new board with clear terrain
    pub fn new(width: u32, height: u32) -> Self {
        let mut hexes = Vec::with_capacity((width * height) as usize);
        for r in 0..height as i32 {
            for q in 0..width as i32 {
                hexes.push(Hex::new(HexCoord::new(q, r), Terrain::Clear));
            }
        }

        Self {
            width,
            height,
            hexes,
        }
    }

    fn index(&self, coord: HexCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.r as u32 * self.width + coord.q as u32) as usize)
        } else {
            None
        }
    }

    /// Get a hex at the given coordinate
    pub fn get_hex(&self, coord: HexCoord) -> Option<&Hex> {
        self.index(coord).and_then(|i| self.hexes.get(i))
    }

    /// Get a mutable hex at the given coordinate
    pub fn get_hex_mut(&mut self, coord: HexCoord) -> Option<&mut Hex> {
        let index = self.index(coord)?;
        self.hexes.get_mut(index)
    }

    /// Check if coordinate is within board bounds
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.q >= 0 && coord.r >= 0 && coord.q < self.width as i32 && coord.r < self.height as i32
    }

    pub fn hexes(&self) -> impl Iterator<Item = &Hex> {
        self.hexes.iter()
    }

    /// Set terrain at a coordinate
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: Terrain) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.terrain = terrain;
        }
    }

    /// Set elevation at a coordinate
    pub fn set_elevation(&mut self, coord: HexCoord, elevation: i8) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.elevation = elevation;
        }
    }

    /// Place a building with the given construction factor
    pub fn set_building(&mut self, coord: HexCoord, construction_factor: u32) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.terrain = Terrain::Building;
            hex.building = Some(Building::new(construction_factor));
        }
    }

    pub fn elevation(&self, coord: HexCoord) -> i8 {
        self.get_hex(coord).map(|h| h.elevation).unwrap_or(0)
    }

    pub fn terrain(&self, coord: HexCoord) -> Terrain {
        self.get_hex(coord).map(|h| h.terrain).unwrap_or_default()
    }

    pub fn building(&self, coord: HexCoord) -> Option<Building> {
        self.get_hex(coord).and_then(|h| h.building)
    }

    /// Trace line of sight between two hexes
    pub fn line_of_sight(&self, from: HexCoord, to: HexCoord) -> LineOfSight {
        let mut result = LineOfSight::default();
        let line = from.line_to(&to);
        if line.len() <= 2 {
            return result;
        }

        let ceiling = self.elevation(from).max(self.elevation(to));
        let target_elevation = self.elevation(to);
        let intervening = &line[1..line.len() - 1];

        for coord in intervening {
            let Some(hex) = self.get_hex(*coord) else {
                continue;
            };
            if hex.blocks_los() || hex.elevation > ceiling {
                result.blocked = true;
                return result;
            }
            result.intervening_woods += hex.terrain.woods_modifier();
        }

        if result.intervening_woods >= WOODS_LOS_LIMIT {
            result.blocked = true;
            return result;
        }

        if let Some(last) = intervening.last() {
            result.partial_cover = self.elevation(*last) == target_elevation + 1;
        }

        result
    }

    /// Check line of sight between two hexes
    pub fn has_line_of_sight(&self, from: HexCoord, to: HexCoord) -> bool {
        !self.line_of_sight(from, to).blocked
    }

    /// Elevation levels crossed moving from one hex to another
    pub fn elevation_change(&self, from: HexCoord, to: HexCoord) -> u32 {
        (self.elevation(to) as i32 - self.elevation(from) as i32).unsigned_abs()
    }

    /// Hexes between a coordinate and one of the board edges
    pub fn distance_to_edge(&self, coord: HexCoord, edge: HomeEdge) -> u32 {
        let distance = match edge {
            HomeEdge::North => coord.r,
            HomeEdge::South => self.height as i32 - 1 - coord.r,
            HomeEdge::West => coord.q,
            HomeEdge::East => self.width as i32 - 1 - coord.q,
        };
        distance.max(0) as u32
    }

    /// Is this hex on the outermost ring of the board?
    pub fn is_edge_hex(&self, coord: HexCoord) -> bool {
        self.in_bounds(coord)
            && (coord.q == 0
                || coord.r == 0
                || coord.q == self.width as i32 - 1
                || coord.r == self.height as i32 - 1)
    }

    pub fn center(&self) -> HexCoord {
        HexCoord::new(self.width as i32 / 2, self.height as i32 / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new(10, 8);
        assert_eq!(board.hexes().count(), 80);
        assert!(board.get_hex(HexCoord::new(9, 7)).is_some());
    }

    #[test]
    fn test_board_out_of_bounds() {
        let board = Board::new(10, 10);
        assert!(board.get_hex(HexCoord::new(100, 100)).is_none());
        assert!(board.get_hex(HexCoord::new(-1, 0)).is_none());
    }

    #[test]
    fn test_get_hex_returns_matching_coord() {
        let board = Board::new(10, 10);
        let coord = HexCoord::new(3, 7);
        assert_eq!(board.get_hex(coord).map(|h| h.coord), Some(coord));
    }

    #[test]
    fn test_line_of_sight_open() {
        let board = Board::new(10, 10);
        assert!(board.has_line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0)));
    }

    #[test]
    fn test_line_of_sight_blocked_by_building() {
        let mut board = Board::new(10, 10);
        board.set_building(HexCoord::new(2, 0), 40);
        assert!(!board.has_line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0)));
    }

    #[test]
    fn test_woods_accumulate_then_block() {
        let mut board = Board::new(10, 10);
        board.set_terrain(HexCoord::new(1, 0), Terrain::LightWoods);
        let los = board.line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0));
        assert!(!los.blocked);
        assert_eq!(los.intervening_woods, 1);

        board.set_terrain(HexCoord::new(2, 0), Terrain::HeavyWoods);
        let los = board.line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0));
        assert!(los.blocked);
    }

    #[test]
    fn test_hill_blocks_los() {
        let mut board = Board::new(10, 10);
        board.set_elevation(HexCoord::new(2, 0), 2);
        assert!(!board.has_line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0)));
    }

    #[test]
    fn test_partial_cover() {
        let mut board = Board::new(10, 10);
        board.set_elevation(HexCoord::new(4, 0), 1);
        board.set_elevation(HexCoord::new(0, 0), 1);
        let los = board.line_of_sight(HexCoord::new(0, 0), HexCoord::new(5, 0));
        assert!(!los.blocked);
        assert!(los.partial_cover);
    }

    #[test]
    fn test_distance_to_edges() {
        let board = Board::new(20, 10);
        let coord = HexCoord::new(3, 4);
        assert_eq!(board.distance_to_edge(coord, HomeEdge::North), 4);
        assert_eq!(board.distance_to_edge(coord, HomeEdge::South), 5);
        assert_eq!(board.distance_to_edge(coord, HomeEdge::West), 3);
        assert_eq!(board.distance_to_edge(coord, HomeEdge::East), 16);
    }
}
