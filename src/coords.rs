use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::types::NodeRef;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert!(x + y + z == 0, "cube coordinates must sum to zero");
        Self { x, y, z }
    }

    pub fn add(self, other: CubeCoord) -> Self {
        CubeCoord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Default for CubeCoord {
    fn default() -> Self {
        CubeCoord::new(0, 0, 0)
    }
}

pub static UNIT_VECTORS: Lazy<HashMap<Direction, CubeCoord>> = Lazy::new(|| {
    use Direction::*;
    HashMap::from([
        (NorthEast, CubeCoord::new(1, 0, -1)),
        (SouthWest, CubeCoord::new(-1, 0, 1)),
        (NorthWest, CubeCoord::new(0, 1, -1)),
        (SouthEast, CubeCoord::new(0, -1, 1)),
        (East, CubeCoord::new(1, -1, 0)),
        (West, CubeCoord::new(-1, 1, 0)),
    ])
});

pub fn add(a: CubeCoord, b: CubeCoord) -> CubeCoord {
    a.add(b)
}

/// Odd-row offset coordinates `(col, row)` of a pointy-top hex.
pub fn cube_to_offset(cube: CubeCoord) -> (i32, i32) {
    let col = cube.x + (cube.z - (cube.z & 1)) / 2;
    (col, cube.z)
}

/// Brick-wall address of a settlement node.
///
/// Every hex row contributes a zig-zag of nodes along its top edge; the
/// bottom zig-zag of row `z` is the top zig-zag of row `z + 1`. Along a
/// row, neighbouring nodes differ by one column. Each node has one more
/// neighbour straight up (when `row + col` is even) or straight down
/// (when odd).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeCoord {
    pub row: i32,
    pub col: i32,
}

/// Row/column deltas from a node to every node two edges away.
pub const TWO_AWAY_OFFSETS: [(i32, i32); 6] = [(0, -2), (0, 2), (-1, -1), (-1, 1), (1, -1), (1, 1)];

impl NodeCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Address of one corner of the hex at `hex`.
    pub fn from_hex_corner(hex: CubeCoord, corner: NodeRef) -> Self {
        let (q, z) = cube_to_offset(hex);
        let centre = 2 * q + (z & 1);
        let (row, col) = match corner {
            NodeRef::North => (z, centre),
            NodeRef::NorthWest => (z, centre - 1),
            NodeRef::NorthEast => (z, centre + 1),
            NodeRef::SouthWest => (z + 1, centre - 1),
            NodeRef::South => (z + 1, centre),
            NodeRef::SouthEast => (z + 1, centre + 1),
        };
        Self { row, col }
    }

    pub fn offset(self, delta: (i32, i32)) -> Self {
        Self {
            row: self.row + delta.0,
            col: self.col + delta.1,
        }
    }

    fn points_up(self) -> bool {
        (self.row + self.col).rem_euclid(2) == 0
    }

    /// The three lattice neighbours, whether or not they lie on a board.
    pub fn neighbors(self) -> [NodeCoord; 3] {
        let vertical = if self.points_up() { -1 } else { 1 };
        [
            self.offset((0, -1)),
            self.offset((0, 1)),
            self.offset((vertical, 0)),
        ]
    }

    pub fn is_adjacent(self, other: NodeCoord) -> bool {
        self.neighbors().contains(&other)
    }

    pub fn two_away(self) -> impl Iterator<Item = NodeCoord> {
        TWO_AWAY_OFFSETS.into_iter().map(move |delta| self.offset(delta))
    }

    /// The node between `self` and a node two steps away. The road from
    /// `self` toward `destination` runs over `(self, via)`.
    pub fn via(self, destination: NodeCoord) -> Option<NodeCoord> {
        let delta = (destination.row - self.row, destination.col - self.col);
        let side = delta.1.signum();
        match delta {
            (0, -2) | (0, 2) => Some(self.offset((0, side))),
            (-1, -1) | (-1, 1) if self.points_up() => Some(self.offset((-1, 0))),
            (1, -1) | (1, 1) if self.points_up() => Some(self.offset((0, side))),
            (1, -1) | (1, 1) => Some(self.offset((1, 0))),
            (-1, -1) | (-1, 1) => Some(self.offset((0, side))),
            _ => None,
        }
    }
}

impl fmt::Display for NodeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_corners_get_one_address() {
        let centre = CubeCoord::new(0, 0, 0);
        let east = CubeCoord::new(1, -1, 0);
        let south_east = CubeCoord::new(0, -1, 1);
        assert_eq!(
            NodeCoord::from_hex_corner(centre, NodeRef::NorthEast),
            NodeCoord::from_hex_corner(east, NodeRef::NorthWest)
        );
        assert_eq!(
            NodeCoord::from_hex_corner(centre, NodeRef::SouthEast),
            NodeCoord::from_hex_corner(east, NodeRef::SouthWest)
        );
        assert_eq!(
            NodeCoord::from_hex_corner(centre, NodeRef::South),
            NodeCoord::from_hex_corner(south_east, NodeRef::NorthWest)
        );
        assert_eq!(
            NodeCoord::from_hex_corner(centre, NodeRef::SouthEast),
            NodeCoord::from_hex_corner(south_east, NodeRef::North)
        );
    }

    #[test]
    fn hex_ring_is_connected_in_order() {
        let hex = CubeCoord::new(-1, 2, -1);
        let ring = [
            NodeRef::North,
            NodeRef::NorthEast,
            NodeRef::SouthEast,
            NodeRef::South,
            NodeRef::SouthWest,
            NodeRef::NorthWest,
        ];
        for idx in 0..ring.len() {
            let a = NodeCoord::from_hex_corner(hex, ring[idx]);
            let b = NodeCoord::from_hex_corner(hex, ring[(idx + 1) % ring.len()]);
            assert!(a.is_adjacent(b), "{a} should touch {b}");
            assert!(b.is_adjacent(a), "{b} should touch {a}");
        }
    }

    #[test]
    fn adjacency_is_symmetric() {
        for row in -4..4 {
            for col in -8..8 {
                let node = NodeCoord::new(row, col);
                for neighbor in node.neighbors() {
                    assert!(neighbor.is_adjacent(node));
                }
            }
        }
    }

    #[test]
    fn via_lies_between_for_both_parities() {
        for origin in [NodeCoord::new(0, 0), NodeCoord::new(0, 1), NodeCoord::new(-3, 2)] {
            for destination in origin.two_away() {
                let via = origin.via(destination).expect("two-away has a midpoint");
                assert!(origin.is_adjacent(via), "{origin} -> {via}");
                assert!(via.is_adjacent(destination), "{via} -> {destination}");
            }
        }
    }

    #[test]
    fn via_rejects_far_nodes() {
        let origin = NodeCoord::new(0, 0);
        assert_eq!(origin.via(NodeCoord::new(0, 4)), None);
        assert_eq!(origin.via(NodeCoord::new(0, 1)), None);
        assert_eq!(origin.via(origin), None);
    }
}
