use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{CatanMap, NodeId};
use crate::game::players::PlayerState;
use crate::numbers::{PlayerNumbers, PortFlags};
use crate::planner::PlannerError;

pub type SnapshotId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Claimant {
    /// The planning player builds here.
    Planner,
    /// Somebody else takes the spot.
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Claim {
    node: NodeId,
    by: Claimant,
}

#[derive(Debug, Clone)]
struct Snapshot {
    parent: Option<SnapshotId>,
    claim: Option<Claim>,
}

/// Hypothetical futures of one player, stored as settlement claims
/// layered over the real state. Snapshot 0 is the real state itself;
/// the borrowed player is never touched.
#[derive(Debug)]
pub struct SimArena<'a> {
    map: &'a CatanMap,
    player: &'a PlayerState,
    snapshots: Vec<Snapshot>,
}

impl<'a> SimArena<'a> {
    pub const ROOT: SnapshotId = 0;

    pub fn new(map: &'a CatanMap, player: &'a PlayerState) -> Self {
        Self {
            map,
            player,
            snapshots: vec![Snapshot {
                parent: None,
                claim: None,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Derive a snapshot where `node` is settled by `by`.
    pub fn claim(
        &mut self,
        parent: SnapshotId,
        node: NodeId,
        by: Claimant,
    ) -> Result<SnapshotId, PlannerError> {
        if parent >= self.snapshots.len() {
            return Err(PlannerError::UnknownSnapshot(parent));
        }
        if !self.map.is_land_node(node) {
            return Err(PlannerError::UnknownNode(node));
        }
        if !self.is_potential(parent, node) {
            return Err(PlannerError::NodeUnavailable(node));
        }
        self.snapshots.push(Snapshot {
            parent: Some(parent),
            claim: Some(Claim { node, by }),
        });
        Ok(self.snapshots.len() - 1)
    }

    /// Claims from `id` back to the root, newest first.
    fn claims(&self, id: SnapshotId) -> impl Iterator<Item = Claim> + '_ {
        let mut cursor = self.snapshots.get(id).map(|_| id);
        std::iter::from_fn(move || {
            loop {
                let snapshot = &self.snapshots[cursor?];
                cursor = snapshot.parent;
                if let Some(claim) = snapshot.claim {
                    return Some(claim);
                }
            }
        })
    }

    pub fn is_potential(&self, id: SnapshotId, node: NodeId) -> bool {
        self.player.is_potential_settlement(node)
            && self
                .claims(id)
                .all(|claim| claim.node != node && !self.map.are_adjacent(claim.node, node))
    }

    pub fn potential_settlements(&self, id: SnapshotId) -> BTreeSet<NodeId> {
        let mut potentials = self.player.potential_settlements().clone();
        for claim in self.claims(id) {
            potentials.remove(&claim.node);
            for neighbor in self.map.neighbors_of(claim.node) {
                potentials.remove(&neighbor);
            }
        }
        potentials
    }

    pub fn numbers(&self, id: SnapshotId) -> PlayerNumbers {
        let mut numbers = self.player.numbers().clone();
        for node in self.own_claims(id) {
            numbers.add_node(self.map, node);
        }
        numbers
    }

    pub fn ports(&self, id: SnapshotId) -> PortFlags {
        let mut ports = self.player.ports();
        for node in self.own_claims(id) {
            ports.add_node(self.map, node);
        }
        ports
    }

    fn own_claims(&self, id: SnapshotId) -> impl Iterator<Item = NodeId> + '_ {
        self.claims(id)
            .filter(|claim| claim.by == Claimant::Planner)
            .map(|claim| claim.node)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::board::MapType;
    use crate::types::Color;

    fn setup() -> (CatanMap, PlayerState) {
        let mut rng = StdRng::seed_from_u64(3);
        let map = CatanMap::build_with_rng(MapType::Tournament, &mut rng).expect("map");
        let player = PlayerState::new(0, Color::Red, &map);
        (map, player)
    }

    #[test]
    fn enemy_claim_blocks_node_and_neighbours() {
        let (map, player) = setup();
        let mut arena = SimArena::new(&map, &player);
        let node = map.min_node_id().expect("nodes");
        let after = arena.claim(SimArena::ROOT, node, Claimant::Enemy).expect("claim");

        assert!(!arena.is_potential(after, node));
        for neighbor in map.neighbors_of(node) {
            assert!(!arena.is_potential(after, neighbor));
        }
        assert!(arena.is_potential(SimArena::ROOT, node));
        assert!(!arena.potential_settlements(after).contains(&node));
        assert!(arena.numbers(after).is_empty());
    }

    #[test]
    fn own_claims_add_production_and_ports() {
        let (map, player) = setup();
        let mut arena = SimArena::new(&map, &player);
        let port_node = *map
            .port_nodes_for(None)
            .and_then(|nodes| nodes.first())
            .expect("3:1 port");
        let after = arena
            .claim(SimArena::ROOT, port_node, Claimant::Planner)
            .expect("claim");
        assert!(arena.ports(after).misc);
        assert!(!arena.ports(SimArena::ROOT).misc);
        assert_eq!(arena.numbers(after), PlayerNumbers::for_node(&map, port_node));
        assert!(!arena.is_potential(after, port_node));
    }

    #[test]
    fn claims_chain_through_parents() {
        let (map, player) = setup();
        let mut arena = SimArena::new(&map, &player);
        let mut potentials = arena.potential_settlements(SimArena::ROOT);
        let mut snapshot = SimArena::ROOT;
        for _ in 0..3 {
            let node = *potentials.first().expect("spot left");
            snapshot = arena.claim(snapshot, node, Claimant::Enemy).expect("claim");
            potentials = arena.potential_settlements(snapshot);
            assert!(!potentials.contains(&node));
        }
        assert_eq!(arena.len(), 4);
        assert!(arena.numbers(snapshot).is_empty());
    }

    #[test]
    fn cannot_claim_blocked_or_unknown_nodes() {
        let (map, player) = setup();
        let mut arena = SimArena::new(&map, &player);
        let node = map.min_node_id().expect("nodes");
        let after = arena.claim(SimArena::ROOT, node, Claimant::Enemy).expect("claim");
        assert_eq!(
            arena.claim(after, node, Claimant::Planner),
            Err(PlannerError::NodeUnavailable(node))
        );
        assert_eq!(
            arena.claim(after, NodeId::MAX, Claimant::Planner),
            Err(PlannerError::UnknownNode(NodeId::MAX))
        );
        assert_eq!(
            arena.claim(99, node, Claimant::Planner),
            Err(PlannerError::UnknownSnapshot(99))
        );
    }

    #[test]
    fn real_player_is_left_alone() {
        let (map, player) = setup();
        let before = player.clone();
        {
            let mut arena = SimArena::new(&map, &player);
            let mut snapshot = SimArena::ROOT;
            while let Some(node) = arena.potential_settlements(snapshot).first().copied() {
                snapshot = arena.claim(snapshot, node, Claimant::Planner).expect("claim");
            }
        }
        assert_eq!(player, before);
    }
}
