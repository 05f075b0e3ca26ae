use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::IntoEnumIterator;

use crate::coords::{CubeCoord, Direction, NodeCoord, UNIT_VECTORS, add};
use crate::types::{EdgeRef, NodeRef, Resource};

pub type NodeId = u16;
pub type EdgeId = (NodeId, NodeId);

type NodeMap = HashMap<NodeRef, NodeId>;
type EdgeMap = HashMap<EdgeRef, EdgeId>;

/// Ways to roll each total with two dice, out of 36.
pub const DICE_WAYS: [u32; 13] = [0, 0, 1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1];

/// Rounded percentage of rolls landing on each total. These are the
/// weights the node scorer and rarity estimator work in.
pub const NUMBER_WEIGHTS: [u32; 13] = [0, 0, 3, 6, 8, 11, 14, 17, 14, 11, 8, 6, 3];

pub fn number_weight(number: u8) -> u32 {
    NUMBER_WEIGHTS.get(number as usize).copied().unwrap_or(0)
}

pub fn dice_ways(number: u8) -> u32 {
    DICE_WAYS.get(number as usize).copied().unwrap_or(0)
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("node {node} addressed as both {first} and {second}")]
    InconsistentLattice {
        node: NodeId,
        first: NodeCoord,
        second: NodeCoord,
    },
    #[error("lattice address {coord} shared by nodes {first} and {second}")]
    DuplicateAddress {
        coord: NodeCoord,
        first: NodeId,
        second: NodeId,
    },
    #[error("tile at {0:?} is missing a corner")]
    MissingCorner(CubeCoord),
    #[error("template ran out of {0}")]
    TemplateExhausted(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandTile {
    pub id: u16,
    pub resource: Option<Resource>,
    pub number: Option<u8>,
    pub nodes: NodeMap,
    pub edges: EdgeMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub id: u16,
    pub resource: Option<Resource>,
    pub direction: Direction,
    pub nodes: NodeMap,
    pub edges: EdgeMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Water {
    pub nodes: NodeMap,
    pub edges: EdgeMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Tile {
    Land(LandTile),
    Port(Port),
    Water(Water),
}

impl Tile {
    pub fn nodes(&self) -> &NodeMap {
        match self {
            Tile::Land(tile) => &tile.nodes,
            Tile::Port(port) => &port.nodes,
            Tile::Water(water) => &water.nodes,
        }
    }

    fn edges(&self) -> &EdgeMap {
        match self {
            Tile::Land(tile) => &tile.edges,
            Tile::Port(port) => &port.edges,
            Tile::Water(water) => &water.edges,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TileTemplate {
    Land,
    Water,
    Port(Direction),
}

#[derive(Debug, Clone)]
pub struct MapTemplate {
    pub numbers: Vec<u8>,
    pub port_resources: Vec<Option<Resource>>,
    pub tile_resources: Vec<Option<Resource>>,
    pub topology: Vec<(CubeCoord, TileTemplate)>,
}

impl MapTemplate {
    pub fn base() -> &'static MapTemplate {
        &BASE_TEMPLATE
    }

    pub fn mini() -> &'static MapTemplate {
        &MINI_TEMPLATE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MapType {
    #[default]
    Base,
    Tournament,
    Mini,
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MapType::Base => "BASE",
            MapType::Tournament => "TOURNAMENT",
            MapType::Mini => "MINI",
        };
        write!(f, "{label}")
    }
}

impl FromStr for MapType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Ok(MapType::Base),
            "tournament" => Ok(MapType::Tournament),
            "mini" => Ok(MapType::Mini),
            _ => Err(format!("unknown map type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MapShuffleOverrides<'a> {
    pub numbers: Option<&'a [u8]>,
    pub port_resources: Option<&'a [Option<Resource>]>,
    pub tile_resources: Option<&'a [Option<Resource>]>,
}

/// Immutable board layout. Everything the planner asks about the board
/// is answered from the lookup tables built in [`CatanMap::from_tiles`].
#[derive(Debug, Clone)]
pub struct CatanMap {
    pub tiles: HashMap<CubeCoord, Tile>,
    pub land_tiles: HashMap<CubeCoord, LandTile>,
    pub port_nodes: BTreeMap<Option<Resource>, BTreeSet<NodeId>>,
    pub land_nodes: BTreeSet<NodeId>,
    pub adjacent_tiles: HashMap<NodeId, SmallVec<[u16; 3]>>,
    pub node_neighbors: HashMap<NodeId, HashSet<NodeId>>,
    pub node_edges: HashMap<NodeId, Vec<EdgeId>>,
    pub tiles_by_id: HashMap<u16, LandTile>,
    node_coords: HashMap<NodeId, NodeCoord>,
    coord_nodes: HashMap<NodeCoord, NodeId>,
}

impl CatanMap {
    pub fn from_template_with_rng(
        template: &MapTemplate,
        overrides: MapShuffleOverrides<'_>,
        rng: &mut impl rand::Rng,
    ) -> Result<Self, BoardError> {
        let tiles = initialize_tiles(template, overrides, rng)?;
        Self::from_tiles(tiles)
    }

    pub fn from_tiles(tiles: HashMap<CubeCoord, Tile>) -> Result<Self, BoardError> {
        let land_tiles: HashMap<CubeCoord, LandTile> = tiles
            .iter()
            .filter_map(|(coord, tile)| match tile {
                Tile::Land(land) => Some((*coord, land.clone())),
                _ => None,
            })
            .collect();

        let tiles_by_id: HashMap<u16, LandTile> = land_tiles
            .values()
            .map(|tile| (tile.id, tile.clone()))
            .collect();

        let mut port_nodes: BTreeMap<Option<Resource>, BTreeSet<NodeId>> = BTreeMap::new();
        for (coord, tile) in &tiles {
            if let Tile::Port(port) = tile {
                let (first_ref, second_ref) = port_node_refs(port.direction);
                let entry = port_nodes.entry(port.resource).or_default();
                for node_ref in [first_ref, second_ref] {
                    let node = port
                        .nodes
                        .get(&node_ref)
                        .ok_or(BoardError::MissingCorner(*coord))?;
                    entry.insert(*node);
                }
            }
        }

        let land_nodes: BTreeSet<NodeId> = land_tiles
            .values()
            .flat_map(|tile| tile.nodes.values().copied())
            .collect();

        let mut adjacent_tiles: HashMap<NodeId, SmallVec<[u16; 3]>> = HashMap::new();
        for tile in land_tiles.values() {
            for node_id in tile.nodes.values() {
                adjacent_tiles.entry(*node_id).or_default().push(tile.id);
            }
        }
        for ids in adjacent_tiles.values_mut() {
            ids.sort_unstable();
        }

        let mut node_neighbors: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
        let mut node_edges: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
        for tile in tiles.values() {
            for edge in tile.edges().values() {
                let (a, b) = *edge;
                node_neighbors.entry(a).or_default().insert(b);
                node_neighbors.entry(b).or_default().insert(a);
                let normalized = normalize_edge(*edge);
                for node in [a, b] {
                    let list = node_edges.entry(node).or_default();
                    if !list.contains(&normalized) {
                        list.push(normalized);
                    }
                }
            }
        }
        for list in node_edges.values_mut() {
            list.sort_unstable();
        }

        let mut node_coords: HashMap<NodeId, NodeCoord> = HashMap::new();
        let mut coord_nodes: HashMap<NodeCoord, NodeId> = HashMap::new();
        for (hex, tile) in &tiles {
            for (corner, node) in tile.nodes() {
                let coord = NodeCoord::from_hex_corner(*hex, *corner);
                if let Some(existing) = node_coords.insert(*node, coord) {
                    if existing != coord {
                        return Err(BoardError::InconsistentLattice {
                            node: *node,
                            first: existing,
                            second: coord,
                        });
                    }
                }
                if let Some(other) = coord_nodes.insert(coord, *node) {
                    if other != *node {
                        return Err(BoardError::DuplicateAddress {
                            coord,
                            first: other,
                            second: *node,
                        });
                    }
                }
            }
        }

        Ok(Self {
            tiles,
            land_tiles,
            port_nodes,
            land_nodes,
            adjacent_tiles,
            node_edges,
            node_neighbors,
            tiles_by_id,
            node_coords,
            coord_nodes,
        })
    }

    pub fn build_with_rng(map_type: MapType, rng: &mut impl rand::Rng) -> Result<Self, BoardError> {
        match map_type {
            MapType::Base => CatanMap::from_template_with_rng(
                MapTemplate::base(),
                MapShuffleOverrides::default(),
                rng,
            ),
            MapType::Mini => CatanMap::from_template_with_rng(
                MapTemplate::mini(),
                MapShuffleOverrides::default(),
                rng,
            ),
            MapType::Tournament => build_tournament_map(rng),
        }
    }

    /// Settlement nodes are the corners of land tiles.
    pub fn is_land_node(&self, node: NodeId) -> bool {
        self.land_nodes.contains(&node)
    }

    pub fn min_node_id(&self) -> Option<NodeId> {
        self.land_nodes.first().copied()
    }

    pub fn node_coord(&self, node: NodeId) -> Option<NodeCoord> {
        self.node_coords.get(&node).copied()
    }

    /// The land node at a lattice address, if the board has one there.
    pub fn node_at(&self, coord: NodeCoord) -> Option<NodeId> {
        self.coord_nodes
            .get(&coord)
            .copied()
            .filter(|node| self.is_land_node(*node))
    }

    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.node_neighbors
            .get(&a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    pub fn neighbors_of(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node_neighbors
            .get(&node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Resource and number of every producing hex touching `node`.
    pub fn producing_tiles(&self, node: NodeId) -> impl Iterator<Item = &LandTile> + '_ {
        self.adjacent_tiles
            .get(&node)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.tiles_by_id.get(id))
            .filter(|tile| tile.resource.is_some() && tile.number.is_some())
    }

    /// Sum of number weights over the hexes around `node`.
    pub fn node_number_weight(&self, node: NodeId) -> u32 {
        self.producing_tiles(node)
            .filter_map(|tile| tile.number)
            .map(number_weight)
            .sum()
    }

    /// Port type at `node`: `Some(None)` for a 3:1 port,
    /// `Some(Some(resource))` for a 2:1 port, `None` without a port.
    pub fn port_at(&self, node: NodeId) -> Option<Option<Resource>> {
        self.port_nodes
            .iter()
            .find(|(_, nodes)| nodes.contains(&node))
            .map(|(kind, _)| *kind)
    }

    pub fn port_nodes_for(&self, kind: Option<Resource>) -> Option<&BTreeSet<NodeId>> {
        self.port_nodes.get(&kind)
    }
}

pub fn normalize_edge(edge: EdgeId) -> EdgeId {
    if edge.0 <= edge.1 {
        edge
    } else {
        (edge.1, edge.0)
    }
}

fn build_tournament_map(rng: &mut impl rand::Rng) -> Result<CatanMap, BoardError> {
    static TOURNAMENT_NUMBERS: Lazy<Vec<u8>> =
        Lazy::new(|| vec![10, 8, 3, 6, 2, 5, 10, 8, 4, 11, 12, 9, 5, 4, 9, 11, 3, 6]);
    static TOURNAMENT_PORTS: Lazy<Vec<Option<Resource>>> = Lazy::new(|| {
        vec![
            None,
            Some(Resource::Sheep),
            None,
            Some(Resource::Ore),
            Some(Resource::Wheat),
            None,
            Some(Resource::Wood),
            Some(Resource::Brick),
            None,
        ]
    });
    static TOURNAMENT_TILES: Lazy<Vec<Option<Resource>>> = Lazy::new(|| {
        vec![
            None,
            Some(Resource::Wood),
            Some(Resource::Sheep),
            Some(Resource::Sheep),
            Some(Resource::Wood),
            Some(Resource::Wheat),
            Some(Resource::Wood),
            Some(Resource::Wheat),
            Some(Resource::Brick),
            Some(Resource::Sheep),
            Some(Resource::Brick),
            Some(Resource::Sheep),
            Some(Resource::Wheat),
            Some(Resource::Wheat),
            Some(Resource::Ore),
            Some(Resource::Brick),
            Some(Resource::Ore),
            Some(Resource::Wood),
            Some(Resource::Ore),
            None,
        ]
    });

    CatanMap::from_template_with_rng(
        MapTemplate::base(),
        MapShuffleOverrides {
            numbers: Some(&TOURNAMENT_NUMBERS),
            port_resources: Some(&TOURNAMENT_PORTS),
            tile_resources: Some(&TOURNAMENT_TILES),
        },
        rng,
    )
}

fn initialize_tiles(
    template: &MapTemplate,
    overrides: MapShuffleOverrides<'_>,
    rng: &mut impl rand::Rng,
) -> Result<HashMap<CubeCoord, Tile>, BoardError> {
    let mut numbers = overrides
        .numbers
        .map(|slice| slice.to_vec())
        .unwrap_or_else(|| template.numbers.clone());
    if overrides.numbers.is_none() {
        numbers.shuffle(rng);
    }

    let mut port_resources = overrides
        .port_resources
        .map(|slice| slice.to_vec())
        .unwrap_or_else(|| template.port_resources.clone());
    if overrides.port_resources.is_none() {
        port_resources.shuffle(rng);
    }

    let mut tile_resources = overrides
        .tile_resources
        .map(|slice| slice.to_vec())
        .unwrap_or_else(|| template.tile_resources.clone());
    if overrides.tile_resources.is_none() {
        tile_resources.shuffle(rng);
    }

    let mut tiles: HashMap<CubeCoord, Tile> = HashMap::new();
    let mut node_autoinc: NodeId = 0;
    let mut land_autoinc: u16 = 0;
    let mut port_autoinc: u16 = 0;

    for (coord, template_kind) in &template.topology {
        let (nodes, edges, next_autoinc) = get_nodes_and_edges(&tiles, *coord, node_autoinc)?;
        node_autoinc = next_autoinc;

        match template_kind {
            TileTemplate::Land => {
                let resource = tile_resources
                    .pop()
                    .ok_or(BoardError::TemplateExhausted("tile resources"))?;
                let number = match resource {
                    Some(_) => Some(
                        numbers
                            .pop()
                            .ok_or(BoardError::TemplateExhausted("numbers"))?,
                    ),
                    None => None,
                };
                let tile = LandTile {
                    id: land_autoinc,
                    resource,
                    number,
                    nodes,
                    edges,
                };
                tiles.insert(*coord, Tile::Land(tile));
                land_autoinc += 1;
            }
            TileTemplate::Water => {
                tiles.insert(*coord, Tile::Water(Water { nodes, edges }));
            }
            TileTemplate::Port(direction) => {
                let resource = port_resources
                    .pop()
                    .ok_or(BoardError::TemplateExhausted("port resources"))?;
                let port = Port {
                    id: port_autoinc,
                    resource,
                    direction: *direction,
                    nodes,
                    edges,
                };
                tiles.insert(*coord, Tile::Port(port));
                port_autoinc += 1;
            }
        }
    }

    Ok(tiles)
}

/// Which corners of the neighbour in `direction` are shared with this
/// tile, as `(our corner, their corner)` pairs, plus the shared edge.
fn shared_with(direction: Direction) -> ([(NodeRef, NodeRef); 2], (EdgeRef, EdgeRef)) {
    use NodeRef::*;
    match direction {
        Direction::East => (
            [(NorthEast, NorthWest), (SouthEast, SouthWest)],
            (EdgeRef::East, EdgeRef::West),
        ),
        Direction::SouthEast => (
            [(South, NorthWest), (SouthEast, North)],
            (EdgeRef::SouthEast, EdgeRef::NorthWest),
        ),
        Direction::SouthWest => (
            [(South, NorthEast), (SouthWest, North)],
            (EdgeRef::SouthWest, EdgeRef::NorthEast),
        ),
        Direction::West => (
            [(NorthWest, NorthEast), (SouthWest, SouthEast)],
            (EdgeRef::West, EdgeRef::East),
        ),
        Direction::NorthWest => (
            [(North, SouthEast), (NorthWest, South)],
            (EdgeRef::NorthWest, EdgeRef::SouthEast),
        ),
        Direction::NorthEast => (
            [(North, SouthWest), (NorthEast, South)],
            (EdgeRef::NorthEast, EdgeRef::SouthWest),
        ),
    }
}

fn get_nodes_and_edges(
    tiles: &HashMap<CubeCoord, Tile>,
    coordinate: CubeCoord,
    mut node_autoinc: NodeId,
) -> Result<(NodeMap, EdgeMap, NodeId), BoardError> {
    let mut nodes: HashMap<NodeRef, NodeId> = HashMap::new();
    let mut edges: HashMap<EdgeRef, EdgeId> = HashMap::new();

    for direction in Direction::iter() {
        let Some(offset) = UNIT_VECTORS.get(&direction).copied() else {
            continue;
        };
        let Some(neighbor) = tiles.get(&add(coordinate, offset)) else {
            continue;
        };
        let (corners, (ours, theirs)) = shared_with(direction);
        for (our_corner, their_corner) in corners {
            if let Some(id) = neighbor.nodes().get(&their_corner) {
                nodes.insert(our_corner, *id);
            }
        }
        if let Some(edge) = neighbor.edges().get(&theirs) {
            edges.insert(ours, *edge);
        }
    }

    // Fixed corner order keeps node ids stable from run to run.
    for node_ref in NodeRef::iter() {
        if !nodes.contains_key(&node_ref) {
            nodes.insert(node_ref, node_autoinc);
            node_autoinc += 1;
        }
    }

    for edge_ref in EdgeRef::iter() {
        if edges.contains_key(&edge_ref) {
            continue;
        }
        let (a_ref, b_ref) = get_edge_nodes(edge_ref);
        let a = *nodes
            .get(&a_ref)
            .ok_or(BoardError::MissingCorner(coordinate))?;
        let b = *nodes
            .get(&b_ref)
            .ok_or(BoardError::MissingCorner(coordinate))?;
        edges.insert(edge_ref, (a, b));
    }

    Ok((nodes, edges, node_autoinc))
}

fn get_edge_nodes(edge_ref: EdgeRef) -> (NodeRef, NodeRef) {
    match edge_ref {
        EdgeRef::East => (NodeRef::NorthEast, NodeRef::SouthEast),
        EdgeRef::SouthEast => (NodeRef::SouthEast, NodeRef::South),
        EdgeRef::SouthWest => (NodeRef::South, NodeRef::SouthWest),
        EdgeRef::West => (NodeRef::SouthWest, NodeRef::NorthWest),
        EdgeRef::NorthWest => (NodeRef::NorthWest, NodeRef::North),
        EdgeRef::NorthEast => (NodeRef::North, NodeRef::NorthEast),
    }
}

fn port_node_refs(direction: Direction) -> (NodeRef, NodeRef) {
    match direction {
        Direction::West => (NodeRef::NorthWest, NodeRef::SouthWest),
        Direction::NorthWest => (NodeRef::North, NodeRef::NorthWest),
        Direction::NorthEast => (NodeRef::NorthEast, NodeRef::North),
        Direction::East => (NodeRef::SouthEast, NodeRef::NorthEast),
        Direction::SouthEast => (NodeRef::South, NodeRef::SouthEast),
        Direction::SouthWest => (NodeRef::SouthWest, NodeRef::South),
    }
}

static BASE_TEMPLATE: Lazy<MapTemplate> = Lazy::new(|| MapTemplate {
    numbers: vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12],
    port_resources: vec![
        Some(Resource::Wood),
        Some(Resource::Brick),
        Some(Resource::Sheep),
        Some(Resource::Wheat),
        Some(Resource::Ore),
        None,
        None,
        None,
        None,
    ],
    tile_resources: vec![
        Some(Resource::Wood),
        Some(Resource::Wood),
        Some(Resource::Wood),
        Some(Resource::Wood),
        Some(Resource::Brick),
        Some(Resource::Brick),
        Some(Resource::Brick),
        Some(Resource::Sheep),
        Some(Resource::Sheep),
        Some(Resource::Sheep),
        Some(Resource::Sheep),
        Some(Resource::Wheat),
        Some(Resource::Wheat),
        Some(Resource::Wheat),
        Some(Resource::Wheat),
        Some(Resource::Ore),
        Some(Resource::Ore),
        Some(Resource::Ore),
        None,
    ],
    topology: base_topology(),
});

static MINI_TEMPLATE: Lazy<MapTemplate> = Lazy::new(|| MapTemplate {
    numbers: vec![3, 4, 5, 6, 8, 9, 10],
    port_resources: vec![],
    tile_resources: vec![
        Some(Resource::Wood),
        None,
        Some(Resource::Brick),
        Some(Resource::Sheep),
        Some(Resource::Wheat),
        Some(Resource::Wheat),
        Some(Resource::Ore),
    ],
    topology: mini_topology(),
});

fn base_topology() -> Vec<(CubeCoord, TileTemplate)> {
    use TileTemplate::*;
    vec![
        (CubeCoord::new(0, 0, 0), Land),
        (CubeCoord::new(1, -1, 0), Land),
        (CubeCoord::new(0, -1, 1), Land),
        (CubeCoord::new(-1, 0, 1), Land),
        (CubeCoord::new(-1, 1, 0), Land),
        (CubeCoord::new(0, 1, -1), Land),
        (CubeCoord::new(1, 0, -1), Land),
        (CubeCoord::new(2, -2, 0), Land),
        (CubeCoord::new(1, -2, 1), Land),
        (CubeCoord::new(0, -2, 2), Land),
        (CubeCoord::new(-1, -1, 2), Land),
        (CubeCoord::new(-2, 0, 2), Land),
        (CubeCoord::new(-2, 1, 1), Land),
        (CubeCoord::new(-2, 2, 0), Land),
        (CubeCoord::new(-1, 2, -1), Land),
        (CubeCoord::new(0, 2, -2), Land),
        (CubeCoord::new(1, 1, -2), Land),
        (CubeCoord::new(2, 0, -2), Land),
        (CubeCoord::new(2, -1, -1), Land),
        (CubeCoord::new(3, -3, 0), Port(Direction::West)),
        (CubeCoord::new(2, -3, 1), Water),
        (CubeCoord::new(1, -3, 2), Port(Direction::NorthWest)),
        (CubeCoord::new(0, -3, 3), Water),
        (CubeCoord::new(-1, -2, 3), Port(Direction::NorthWest)),
        (CubeCoord::new(-2, -1, 3), Water),
        (CubeCoord::new(-3, 0, 3), Port(Direction::NorthEast)),
        (CubeCoord::new(-3, 1, 2), Water),
        (CubeCoord::new(-3, 2, 1), Port(Direction::East)),
        (CubeCoord::new(-3, 3, 0), Water),
        (CubeCoord::new(-2, 3, -1), Port(Direction::East)),
        (CubeCoord::new(-1, 3, -2), Water),
        (CubeCoord::new(0, 3, -3), Port(Direction::SouthEast)),
        (CubeCoord::new(1, 2, -3), Water),
        (CubeCoord::new(2, 1, -3), Port(Direction::SouthWest)),
        (CubeCoord::new(3, 0, -3), Water),
        (CubeCoord::new(3, -1, -2), Port(Direction::SouthWest)),
        (CubeCoord::new(3, -2, -1), Water),
    ]
}

fn mini_topology() -> Vec<(CubeCoord, TileTemplate)> {
    use TileTemplate::*;
    vec![
        (CubeCoord::new(0, 0, 0), Land),
        (CubeCoord::new(1, -1, 0), Land),
        (CubeCoord::new(0, -1, 1), Land),
        (CubeCoord::new(-1, 0, 1), Land),
        (CubeCoord::new(-1, 1, 0), Land),
        (CubeCoord::new(0, 1, -1), Land),
        (CubeCoord::new(1, 0, -1), Land),
        (CubeCoord::new(2, -2, 0), Water),
        (CubeCoord::new(1, -2, 1), Water),
        (CubeCoord::new(0, -2, 2), Water),
        (CubeCoord::new(-1, -1, 2), Water),
        (CubeCoord::new(-2, 0, 2), Water),
        (CubeCoord::new(-2, 1, 1), Water),
        (CubeCoord::new(-2, 2, 0), Water),
        (CubeCoord::new(-1, 2, -1), Water),
        (CubeCoord::new(0, 2, -2), Water),
        (CubeCoord::new(1, 1, -2), Water),
        (CubeCoord::new(2, 0, -2), Water),
        (CubeCoord::new(2, -1, -1), Water),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tournament() -> CatanMap {
        let mut rng = StdRng::seed_from_u64(7);
        CatanMap::build_with_rng(MapType::Tournament, &mut rng).expect("tournament map")
    }

    #[test]
    fn number_weights_track_dice_odds() {
        for number in 2u8..=12 {
            let ways = dice_ways(number) as f64;
            let percent = (ways * 100.0 / 36.0).round() as u32;
            assert_eq!(number_weight(number), percent, "number {number}");
        }
        assert_eq!(number_weight(0), 0);
        assert_eq!(number_weight(200), 0);
    }

    #[test]
    fn base_map_has_standard_counts() {
        let map = tournament();
        assert_eq!(map.land_tiles.len(), 19);
        assert_eq!(map.land_nodes.len(), 54);
        assert_eq!(map.min_node_id(), Some(0));
        let port_node_count: usize = map.port_nodes.values().map(BTreeSet::len).sum();
        assert_eq!(port_node_count, 18);
        assert_eq!(map.port_nodes.get(&None).map(BTreeSet::len), Some(8));
    }

    #[test]
    fn lattice_agrees_with_graph_adjacency() {
        let map = tournament();
        for node in &map.land_nodes {
            let coord = map.node_coord(*node).expect("land node has an address");
            for neighbor in map.neighbors_of(*node) {
                let other = map.node_coord(neighbor).expect("neighbor has an address");
                assert!(coord.is_adjacent(other), "{node}@{coord} vs {neighbor}@{other}");
            }
            for lattice_neighbor in coord.neighbors() {
                if let Some(id) = map.node_at(lattice_neighbor) {
                    assert!(map.are_adjacent(*node, id));
                }
            }
        }
    }

    #[test]
    fn node_ids_are_stable_across_builds() {
        let a = tournament();
        let b = tournament();
        for node in &a.land_nodes {
            assert_eq!(a.node_coord(*node), b.node_coord(*node));
        }
    }

    #[test]
    fn port_lookup_matches_port_sets() {
        let map = tournament();
        for (kind, nodes) in &map.port_nodes {
            for node in nodes {
                assert_eq!(map.port_at(*node), Some(*kind));
            }
        }
        let inland = map
            .land_nodes
            .iter()
            .find(|node| map.adjacent_tiles.get(node).map(|ids| ids.len()) == Some(3))
            .copied()
            .expect("inland node");
        assert_eq!(map.port_at(inland), None);
    }

    #[test]
    fn desert_contributes_nothing() {
        let map = tournament();
        let desert = map
            .tiles_by_id
            .values()
            .find(|tile| tile.resource.is_none())
            .expect("desert tile");
        assert_eq!(desert.number, None);
        for node in desert.nodes.values() {
            assert!(map.producing_tiles(*node).all(|tile| tile.id != desert.id));
        }
    }
}
