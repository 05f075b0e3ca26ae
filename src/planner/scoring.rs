use std::collections::{BTreeMap, BTreeSet};

use crate::board::{CatanMap, NodeId, number_weight};
use crate::numbers::PlayerNumbers;
use crate::planner::rarity::ResourceRarity;
use crate::types::Resource;

/// Highest expected number total for one node on its own.
pub const SINGLE_NODE_MAX: u32 = 40;
/// Highest expected total when unseen numbers count double.
pub const NEW_NUMBER_MAX: u32 = 80;

const FULL_SCORE: i32 = 100;

/// Accumulated heuristic score per node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeScores {
    scores: BTreeMap<NodeId, i32>,
}

impl NodeScores {
    pub fn for_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            scores: nodes.into_iter().map(|node| (node, 0)).collect(),
        }
    }

    pub fn get(&self, node: NodeId) -> Option<i32> {
        self.scores.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.scores.keys().copied()
    }

    pub fn add(&mut self, node: NodeId, amount: i32) {
        if let Some(score) = self.scores.get_mut(&node) {
            *score += amount;
        }
    }

    /// Highest score; the lowest node id wins ties.
    pub fn best(&self) -> Option<(NodeId, i32)> {
        self.best_where(|_| true)
    }

    pub fn best_where(&self, mut keep: impl FnMut(NodeId) -> bool) -> Option<(NodeId, i32)> {
        let mut best: Option<(NodeId, i32)> = None;
        for (&node, &score) in &self.scores {
            if !keep(node) {
                continue;
            }
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((node, score));
            }
        }
        best
    }
}

fn scaled(base: i32, weight: f32) -> i32 {
    (base as f32 * weight).round() as i32
}

/// Number-quality pass. With a player profile, numbers the player does
/// not touch yet count double and the scale tops out at
/// [`NEW_NUMBER_MAX`]; without one it tops out at [`SINGLE_NODE_MAX`].
pub fn score_numbers(
    map: &CatanMap,
    scores: &mut NodeScores,
    player: Option<&PlayerNumbers>,
    weight: f32,
) {
    let max = if player.is_some() {
        NEW_NUMBER_MAX
    } else {
        SINGLE_NODE_MAX
    };
    let nodes: Vec<NodeId> = scores.nodes().collect();
    for node in nodes {
        let mut total = 0;
        for tile in map.producing_tiles(node) {
            let Some(number) = tile.number else {
                continue;
            };
            let weight = number_weight(number);
            total += match player {
                Some(numbers) if !numbers.has_number(number) => 2 * weight,
                _ => weight,
            };
        }
        let quality = (total * 100 / max).min(100) as i32;
        scores.add(node, scaled(quality, weight));
    }
}

/// Bonus for nodes that are members of `targets`.
pub fn score_on_node_set(scores: &mut NodeScores, targets: &BTreeSet<NodeId>, weight: f32) {
    let bonus = scaled(FULL_SCORE, weight);
    let nodes: Vec<NodeId> = scores.nodes().filter(|node| targets.contains(node)).collect();
    for node in nodes {
        scores.add(node, bonus);
    }
}

/// Bonus for nodes exactly two lattice steps from a member of `targets`.
/// Members themselves get nothing from this pass.
pub fn score_two_away_from_node_set(
    map: &CatanMap,
    scores: &mut NodeScores,
    targets: &BTreeSet<NodeId>,
    weight: f32,
) {
    let bonus = scaled(FULL_SCORE, weight);
    let nodes: Vec<NodeId> = scores.nodes().collect();
    for node in nodes {
        if targets.contains(&node) {
            continue;
        }
        let Some(coord) = map.node_coord(node) else {
            continue;
        };
        let near_target = coord
            .two_away()
            .filter_map(|other| map.node_at(other))
            .any(|other| targets.contains(&other));
        if near_target {
            scores.add(node, bonus);
        }
    }
}

/// Weight of each 2:1 port worth chasing. Ports whose resource rolls
/// less often than `threshold` are left out.
pub fn port_weights(rarity: &ResourceRarity, threshold: u32, divisor: f32) -> Vec<(Resource, f32)> {
    Resource::ALL
        .into_iter()
        .filter(|resource| rarity[resource.index()] > threshold)
        .map(|resource| (resource, rarity[resource.index()] as f32 / divisor))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::board::MapType;

    fn tournament() -> CatanMap {
        let mut rng = StdRng::seed_from_u64(11);
        CatanMap::build_with_rng(MapType::Tournament, &mut rng).expect("tournament map")
    }

    #[test]
    fn number_pass_normalizes_against_forty() {
        let map = tournament();
        let node = *map.land_nodes.iter().next().expect("land node");
        let mut scores = NodeScores::for_nodes([node]);
        score_numbers(&map, &mut scores, None, 1.0);
        let expected = (map.node_number_weight(node) * 100 / SINGLE_NODE_MAX).min(100) as i32;
        assert_eq!(scores.get(node), Some(expected));
    }

    #[test]
    fn new_numbers_count_double() {
        let map = tournament();
        let node = map
            .land_nodes
            .iter()
            .copied()
            .find(|node| map.producing_tiles(*node).count() == 3)
            .expect("three-hex node");
        let own = PlayerNumbers::for_node(&map, node);

        let mut fresh = NodeScores::for_nodes([node]);
        score_numbers(&map, &mut fresh, Some(&PlayerNumbers::new()), 1.0);
        let mut known = NodeScores::for_nodes([node]);
        score_numbers(&map, &mut known, Some(&own), 1.0);

        let total = map.node_number_weight(node);
        assert_eq!(fresh.get(node), Some((2 * total * 100 / NEW_NUMBER_MAX).min(100) as i32));
        assert_eq!(known.get(node), Some((total * 100 / NEW_NUMBER_MAX) as i32));
    }

    #[test]
    fn weight_scales_the_pass() {
        let map = tournament();
        let nodes: Vec<NodeId> = map.land_nodes.iter().copied().collect();
        let mut once = NodeScores::for_nodes(nodes.clone());
        score_numbers(&map, &mut once, None, 1.0);
        let mut thrice = NodeScores::for_nodes(nodes.clone());
        score_numbers(&map, &mut thrice, None, 3.0);
        for node in nodes {
            assert_eq!(thrice.get(node).map(|s| s / 3), once.get(node));
        }
    }

    #[test]
    fn on_and_two_away_are_exclusive() {
        let map = tournament();
        let ports = map.port_nodes_for(None).expect("3:1 ports").clone();
        let nodes: Vec<NodeId> = map.land_nodes.iter().copied().collect();
        let mut on = NodeScores::for_nodes(nodes.clone());
        score_on_node_set(&mut on, &ports, 0.5);
        let mut near = NodeScores::for_nodes(nodes.clone());
        score_two_away_from_node_set(&map, &mut near, &ports, 0.5);
        for node in nodes {
            let a = on.get(node).unwrap_or_default();
            let b = near.get(node).unwrap_or_default();
            assert!(a == 0 || b == 0, "node {node} scored in both passes");
            if ports.contains(&node) {
                assert_eq!(a, 50);
                assert_eq!(b, 0);
            }
        }
    }

    #[test]
    fn best_prefers_lowest_id_on_ties() {
        let mut scores = NodeScores::for_nodes([4, 2, 9]);
        scores.add(4, 10);
        scores.add(9, 10);
        assert_eq!(scores.best(), Some((4, 10)));
        assert_eq!(scores.best_where(|node| node != 4), Some((9, 10)));
        assert_eq!(scores.best_where(|node| node == 2), Some((2, 0)));
        assert_eq!(scores.best_where(|_| false), None);
    }

    #[test]
    fn ports_below_threshold_are_skipped() {
        let rarity: ResourceRarity = [20, 34, 56, 0, 33];
        let weights = port_weights(&rarity, 33, 56.0);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].0, Resource::Brick);
        assert!((weights[1].1 - 1.0).abs() < f32::EPSILON);
    }
}
