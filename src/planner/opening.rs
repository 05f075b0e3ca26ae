use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::board::{CatanMap, EdgeId, NodeId, normalize_edge};
use crate::estimate::{BuildingSpeedEstimate, RollEstimator, pruned_speed};
use crate::game::players::PlayerState;
use crate::game::state::{SetupPhase, SetupView};
use crate::numbers::{PlayerNumbers, PortFlags};
use crate::planner::arena::{Claimant, SimArena, SnapshotId};
use crate::planner::possibility::{BuildPossibility, PlanAction, PlanTree};
use crate::planner::rarity::RarityCache;
use crate::planner::scoring::{
    NodeScores, port_weights, score_numbers, score_on_node_set, score_two_away_from_node_set,
};
use crate::planner::{PlannerConfig, PlannerError};
use crate::types::{DevelopmentCard, PieceType, Resource};

/// Both initial settlements, in the order they should go down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPair {
    pub first: NodeId,
    pub second: NodeId,
    /// Aggregate speed of the pair; lower is faster.
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPlan {
    pub pair: SettlementPair,
    pub tree: PlanTree,
}

/// Keeps the fastest candidate seen so far. A candidate replaces the
/// current best when it is strictly faster, or equally fast with every
/// estimate inside the cutoff and a higher number weight.
///
/// The weight of a pair sums each node's own weight, so a hex touched by
/// both nodes counts twice there.
struct SpeedSearch<T> {
    best_speed: u32,
    best: Option<(T, u32)>,
}

impl<T: Copy + std::fmt::Debug> SpeedSearch<T> {
    fn new(limit: u32) -> Self {
        Self {
            best_speed: limit,
            best: None,
        }
    }

    fn offer(&mut self, candidate: T, estimator: &impl RollEstimator, weight: u32) {
        let result = pruned_speed(estimator, self.best_speed);
        let replace = match self.best {
            None => true,
            Some((_, best_weight)) => {
                result.speed < self.best_speed
                    || (result.speed == self.best_speed && result.all_the_way && weight > best_weight)
            }
        };
        trace!(
            "{candidate:?}: speed {} (all the way: {}) weight {weight} vs best {}",
            result.speed, result.all_the_way, self.best_speed
        );
        if replace {
            self.best_speed = result.speed;
            self.best = Some((candidate, weight));
        }
    }

    fn finish(self) -> Option<(T, u32)> {
        self.best.map(|(candidate, _)| (candidate, self.best_speed))
    }
}

#[derive(Debug, Default)]
pub struct OpeningPlanner {
    config: PlannerConfig,
    rarity: RarityCache,
}

impl OpeningPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            rarity: RarityCache::new(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Forget board-derived caches. Call when the planner moves to a new board.
    pub fn reset_board(&mut self) {
        self.rarity.invalidate();
    }

    /// Pick the pair of non-adjacent potential settlements whose combined
    /// production builds everything fastest, and decide which goes first.
    pub fn plan_initial_settlements(
        &self,
        map: &CatanMap,
        player: &PlayerState,
    ) -> Result<SettlementPair, PlannerError> {
        let candidates: Vec<NodeId> = player.potential_settlements().iter().copied().collect();
        let mut search = SpeedSearch::new(self.config.pair_speed_limit());
        for (a, b) in candidates.iter().copied().tuple_combinations() {
            if map.are_adjacent(a, b) {
                continue;
            }
            let estimate = pair_estimate(map, a, b);
            let weight = map.node_number_weight(a) + map.node_number_weight(b);
            search.offer((a, b), &estimate, weight);
        }
        let ((a, b), speed) = search.finish().ok_or(PlannerError::NoPlacementFound)?;
        let (first, second) = self.placement_order(map, a, b);
        debug!("seat {} opening pair {first} then {second} at speed {speed}", player.seat);
        Ok(SettlementPair {
            first,
            second,
            speed,
        })
    }

    /// Node of `(a, b)` that should be placed first. The node that is
    /// faster on its own wins; ties keep `a` first.
    pub fn placement_order(&self, map: &CatanMap, a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        if self.solo_speed(map, b) < self.solo_speed(map, a) {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Aggregate speed of `node` as the only settlement.
    pub fn solo_speed(&self, map: &CatanMap, node: NodeId) -> u32 {
        BuildingSpeedEstimate::new(&PlayerNumbers::for_node(map, node), PortFlags::for_node(map, node))
            .total_speed(self.config.order_roll_limit)
    }

    /// Best spot to add to the settlements the player already has.
    pub fn plan_second_settlement(
        &self,
        map: &CatanMap,
        player: &PlayerState,
    ) -> Result<NodeId, PlannerError> {
        let mut search = SpeedSearch::new(self.config.pair_speed_limit());
        for node in player.potential_settlements().iter().copied() {
            let mut numbers = player.numbers().clone();
            numbers.add_node(map, node);
            let mut ports = player.ports();
            ports.add_node(map, node);
            let estimate = BuildingSpeedEstimate::new(&numbers, ports);
            search.offer(node, &estimate, map.node_number_weight(node));
        }
        let (node, speed) = search.finish().ok_or(PlannerError::NoPlacementFound)?;
        debug!("seat {} second settlement {node} at speed {speed}", player.seat);
        Ok(node)
    }

    /// Road from the player's last settlement toward the best node two
    /// steps away. Right after the first settlement the choice accounts
    /// for the spots enemies are expected to take before our next turn.
    pub fn plan_initial_road(
        &self,
        map: &CatanMap,
        player: &PlayerState,
        game: &impl SetupView,
    ) -> Result<EdgeId, PlannerError> {
        let settlement = player.last_settlement().ok_or(PlannerError::NoSettlement)?;
        let candidates = two_away_candidates(map, player, settlement)?;
        if candidates.is_empty() {
            return fallback_road(map, game, settlement);
        }

        let scores = self.road_scores(map, player, candidates.keys().copied());

        let target = if self.config.lookahead && game.setup_phase() == SetupPhase::FirstRoad {
            let mut arena = SimArena::new(map, player);
            let snapshot = self.simulate_enemy_builds(map, &mut arena, count_enemy_builds(game))?;
            let remaining = scores.best_where(|node| arena.is_potential(snapshot, node));
            if remaining.is_none() {
                warn!("every road target around {settlement} is expected to be taken");
            }
            remaining.or_else(|| scores.best())
        } else {
            scores.best()
        };
        let (destination, score) = target.ok_or(PlannerError::NoPlacementFound)?;
        let via = candidates
            .get(&destination)
            .copied()
            .ok_or(PlannerError::NoPlacementFound)?;
        debug!(
            "seat {} road {settlement}-{via} toward {destination} (score {score})",
            player.seat
        );
        Ok(normalize_edge((settlement, via)))
    }

    /// Road targets scored against the player's own numbers and ports.
    fn road_scores(
        &self,
        map: &CatanMap,
        player: &PlayerState,
        candidates: impl IntoIterator<Item = NodeId>,
    ) -> NodeScores {
        let mut scores = NodeScores::for_nodes(candidates);
        score_numbers(map, &mut scores, Some(player.numbers()), 1.0);
        self.score_ports(map, &mut scores, Some(player.ports()));
        scores
    }

    /// What an opponent sees in each spot: numbers and ports only.
    fn enemy_scores(&self, map: &CatanMap, nodes: impl IntoIterator<Item = NodeId>) -> NodeScores {
        let mut scores = NodeScores::for_nodes(nodes);
        score_numbers(map, &mut scores, None, 1.0);
        self.score_ports(map, &mut scores, None);
        scores
    }

    /// Claim the `builds` best spots for enemies, one after another.
    fn simulate_enemy_builds(
        &self,
        map: &CatanMap,
        arena: &mut SimArena<'_>,
        builds: usize,
    ) -> Result<SnapshotId, PlannerError> {
        let mut snapshot = SimArena::ROOT;
        for _ in 0..builds {
            let scores = self.enemy_scores(map, arena.potential_settlements(snapshot));
            let Some((node, score)) = scores.best() else {
                break;
            };
            debug!("look-ahead: enemy takes {node} (score {score})");
            snapshot = arena.claim(snapshot, node, Claimant::Enemy)?;
        }
        Ok(snapshot)
    }

    /// Port passes. With `owned`, ports the player can already use are
    /// skipped, and spots one road short of a missing port score too.
    fn score_ports(&self, map: &CatanMap, scores: &mut NodeScores, owned: Option<PortFlags>) {
        let lacks = |kind: Option<Resource>| owned.is_none_or(|ports| !ports.has(kind));
        let mut passes = Vec::new();
        if lacks(None) {
            passes.push((None, self.config.misc_port_weight));
        }
        let rarity = self.rarity.get(map);
        for (resource, weight) in port_weights(
            rarity,
            self.config.port_rarity_threshold,
            self.config.port_rarity_divisor,
        ) {
            if lacks(Some(resource)) {
                passes.push((Some(resource), weight));
            }
        }
        for (kind, weight) in passes {
            let Some(nodes) = map.port_nodes_for(kind) else {
                continue;
            };
            score_on_node_set(scores, nodes, weight);
            if owned.is_some() {
                score_two_away_from_node_set(map, scores, nodes, weight);
            }
        }
    }

    /// Pair choice plus a speculative tree of what the pair builds next.
    pub fn plan_opening(
        &self,
        map: &CatanMap,
        player: &PlayerState,
    ) -> Result<OpeningPlan, PlannerError> {
        let pair = self.plan_initial_settlements(map, player)?;
        let limit = self.config.order_roll_limit;
        let mut arena = SimArena::new(map, player);
        let after_first = arena.claim(SimArena::ROOT, pair.first, Claimant::Planner)?;
        let after_second = arena.claim(after_first, pair.second, Claimant::Planner)?;

        let estimates_at = |snapshot| {
            BuildingSpeedEstimate::new(&arena.numbers(snapshot), arena.ports(snapshot))
                .estimates_from_nothing_fast(limit)
                .map(|estimate| estimate.or_penalty(limit))
        };
        let before = estimates_at(SimArena::ROOT);
        let first_alone = estimates_at(after_first);
        let both = estimates_at(after_second);

        let mut tree = PlanTree::new();
        let root = tree.add_root(
            BuildPossibility::new(settlement_at(pair.first), after_first)
                .with_speed_deltas(deltas(&before, &first_alone)),
        );
        let second = tree
            .add_child(
                root,
                BuildPossibility::new(settlement_at(pair.second), after_second)
                    .with_speed_deltas(deltas(&first_alone, &both)),
            )
            .ok_or(PlannerError::NoPlacementFound)?;
        for piece in PieceType::ALL {
            let action = match piece {
                PieceType::Card => PlanAction::BuyCard,
                _ => PlanAction::PlacePiece { piece, node: None },
            };
            let eta = both[piece.index()];
            let id = tree
                .add_child(second, BuildPossibility::new(action, after_second).with_eta(eta))
                .ok_or(PlannerError::NoPlacementFound)?;
            if piece == PieceType::Card {
                tree.add_child(
                    id,
                    BuildPossibility::new(PlanAction::PlayCard(DevelopmentCard::Knight), after_second)
                        .with_eta(eta + 1),
                );
            }
        }
        Ok(OpeningPlan { pair, tree })
    }
}

fn settlement_at(node: NodeId) -> PlanAction {
    PlanAction::PlacePiece {
        piece: PieceType::Settlement,
        node: Some(node),
    }
}

fn deltas(before: &[u32; 4], after: &[u32; 4]) -> [i32; 4] {
    std::array::from_fn(|idx| after[idx] as i32 - before[idx] as i32)
}

fn pair_estimate(map: &CatanMap, a: NodeId, b: NodeId) -> BuildingSpeedEstimate {
    let mut numbers = PlayerNumbers::for_node(map, a);
    numbers.add_node(map, b);
    let ports = PortFlags::for_node(map, a).union(PortFlags::for_node(map, b));
    BuildingSpeedEstimate::new(&numbers, ports)
}

/// Nodes two lattice steps from `settlement` that the player could still
/// settle, each mapped to the node the connecting road runs through.
pub fn two_away_candidates(
    map: &CatanMap,
    player: &PlayerState,
    settlement: NodeId,
) -> Result<BTreeMap<NodeId, NodeId>, PlannerError> {
    let origin = map
        .node_coord(settlement)
        .ok_or(PlannerError::UnknownNode(settlement))?;
    let mut candidates = BTreeMap::new();
    for coord in origin.two_away() {
        let Some(destination) = map.node_at(coord) else {
            continue;
        };
        let Some(via) = origin.via(coord).and_then(|via| map.node_at(via)) else {
            continue;
        };
        if player.is_potential_settlement(destination) && map.are_adjacent(settlement, via) {
            candidates.insert(destination, via);
        }
    }
    Ok(candidates)
}

fn fallback_road(
    map: &CatanMap,
    game: &impl SetupView,
    settlement: NodeId,
) -> Result<EdgeId, PlannerError> {
    let edge = map
        .node_edges
        .get(&settlement)
        .into_iter()
        .flatten()
        .copied()
        .filter(|edge| game.is_road_free(*edge))
        .min()
        .ok_or(PlannerError::NoPlacementFound)?;
    warn!("no road target two steps from {settlement}, falling back to {edge:?}");
    Ok(edge)
}

/// Settlements other players place before the current player's next
/// turn. In the first round that is the seats still to place their first
/// settlement, plus the second settlements laid back from the first
/// player to us. Otherwise everyone else goes once.
pub fn count_enemy_builds(game: &impl SetupView) -> usize {
    let max = game.max_players();
    let current = game.current_player();
    if max == 0 || current >= max {
        return 0;
    }
    let first = game.first_player();
    let first_round = game.setup_phase() == SetupPhase::FirstRoad;
    let mut builds = 0;
    if first_round {
        let mut seat = current;
        loop {
            seat = (seat + 1) % max;
            if seat != first && !game.is_seat_vacant(seat) {
                builds += 1;
            }
            if seat == first || seat == current {
                break;
            }
        }
    }
    // The second round runs back from the first player to us.
    let mut seat = if first_round { first } else { current };
    loop {
        seat = (seat + max - 1) % max;
        if seat == current {
            break;
        }
        if !game.is_seat_vacant(seat) {
            builds += 1;
        }
    }
    builds
}
