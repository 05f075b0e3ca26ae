use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{CatanMap, EdgeId, NodeId};
use crate::game::resources::ResourceBundle;
use crate::numbers::{PlayerNumbers, PortFlags};
use crate::types::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub seat: usize,
    pub color: Color,
    pub resources: ResourceBundle,
    pub roads: BTreeSet<EdgeId>,
    pub settlements: BTreeSet<NodeId>,
    potential_settlements: BTreeSet<NodeId>,
    numbers: PlayerNumbers,
    ports: PortFlags,
    last_settlement: Option<NodeId>,
}

impl PlayerState {
    /// Fresh player for whom every land node is still open.
    pub fn new(seat: usize, color: Color, map: &CatanMap) -> Self {
        Self {
            seat,
            color,
            resources: ResourceBundle::zero(),
            roads: BTreeSet::new(),
            settlements: BTreeSet::new(),
            potential_settlements: map.land_nodes.clone(),
            numbers: PlayerNumbers::new(),
            ports: PortFlags::default(),
            last_settlement: None,
        }
    }

    pub fn is_potential_settlement(&self, node: NodeId) -> bool {
        self.potential_settlements.contains(&node)
    }

    pub fn potential_settlements(&self) -> &BTreeSet<NodeId> {
        &self.potential_settlements
    }

    /// Replace the open spots, e.g. when resuming from a saved position.
    pub fn set_potential_settlements(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        self.potential_settlements = nodes.into_iter().collect();
    }

    pub fn numbers(&self) -> &PlayerNumbers {
        &self.numbers
    }

    pub fn ports(&self) -> PortFlags {
        self.ports
    }

    pub fn last_settlement(&self) -> Option<NodeId> {
        self.last_settlement
    }

    pub fn add_settlement(&mut self, map: &CatanMap, node: NodeId) {
        self.settlements.insert(node);
        self.numbers.add_node(map, node);
        self.ports.add_node(map, node);
        self.last_settlement = Some(node);
    }

    /// A settlement anywhere on the board takes its node and the nodes
    /// next to it out of play.
    pub fn block_around(&mut self, map: &CatanMap, node: NodeId) {
        self.potential_settlements.remove(&node);
        for neighbor in map.neighbors_of(node) {
            self.potential_settlements.remove(&neighbor);
        }
    }

    pub fn add_road(&mut self, edge: EdgeId) {
        self.roads.insert(edge);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::board::MapType;

    #[test]
    fn settling_updates_profile_and_potentials() {
        let mut rng = StdRng::seed_from_u64(5);
        let map = CatanMap::build_with_rng(MapType::Base, &mut rng).expect("map");
        let mut player = PlayerState::new(1, Color::Blue, &map);
        assert_eq!(player.potential_settlements().len(), map.land_nodes.len());

        let node = map.min_node_id().expect("nodes");
        player.add_settlement(&map, node);
        player.block_around(&map, node);

        assert_eq!(player.last_settlement(), Some(node));
        assert_eq!(*player.numbers(), PlayerNumbers::for_node(&map, node));
        assert_eq!(player.ports(), PortFlags::for_node(&map, node));
        assert!(!player.is_potential_settlement(node));
        assert!(map.neighbors_of(node).all(|n| !player.is_potential_settlement(n)));
        assert_eq!(player.settlements.len(), 1);
    }
}
