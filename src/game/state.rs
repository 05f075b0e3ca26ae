use std::collections::{BTreeMap, HashMap};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    board::{BoardError, CatanMap, EdgeId, MapType, NodeId, normalize_edge},
    types::{ActionPrompt, ActionType, Color},
};

use super::{
    action::{ActionPayload, GameAction},
    players::PlayerState,
    resources::ResourceBundle,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_players: usize,
    pub max_players: usize,
    pub first_player: usize,
    /// Seats left empty. Players fill the remaining seats in order.
    pub vacant_seats: Vec<usize>,
    pub map_type: MapType,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            max_players: 4,
            first_player: 0,
            vacant_seats: Vec::new(),
            map_type: MapType::Base,
            seed: 42,
        }
    }
}

/// Where the initial placement rounds stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupPhase {
    FirstSettlement,
    FirstRoad,
    SecondSettlement,
    SecondRoad,
    Done,
}

#[derive(Debug, Clone)]
pub enum GamePhase {
    Setup(SetupState),
    Playing,
}

#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BuiltSettlement { player: usize, node: NodeId },
    BuiltRoad { player: usize, edge: EdgeId },
    ResourcesDistributed { player: usize, bundle: ResourceBundle },
    SetupCompleted,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid game config: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("setup already completed")]
    SetupFinished,
    #[error("invalid player index {0}")]
    InvalidPlayer(usize),
    #[error("action by player {actual} but expected {expected}")]
    ActionOutOfTurn { expected: usize, actual: usize },
    #[error("action {action:?} invalid for prompt {prompt:?}")]
    InvalidPrompt {
        prompt: ActionPrompt,
        action: ActionType,
    },
    #[error("missing or invalid payload: {0}")]
    InvalidPayload(&'static str),
    #[error("node {0} is not a land node")]
    NodeNotFound(NodeId),
    #[error("node {0} already occupied")]
    NodeOccupied(NodeId),
    #[error("cannot build adjacent to another settlement")]
    DistanceRuleViolation,
    #[error("edge not found on map")]
    EdgeNotFound,
    #[error("edge already occupied")]
    EdgeOccupied,
    #[error("road must touch the settlement just placed")]
    RoadNotAtSettlement,
    #[error("no legal action for player {0}")]
    NoLegalAction(usize),
}

/// Turn-order and phase queries the opening planner needs.
pub trait SetupView {
    fn setup_phase(&self) -> SetupPhase;
    fn current_player(&self) -> usize;
    fn first_player(&self) -> usize;
    fn is_seat_vacant(&self, seat: usize) -> bool;
    fn max_players(&self) -> usize;
    fn is_road_free(&self, edge: EdgeId) -> bool;
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub map: CatanMap,
    seats: Vec<Option<PlayerState>>,
    pub phase: GamePhase,
    pub pending_prompt: ActionPrompt,
    pub current_player: usize,
    pub node_occupancy: BTreeMap<NodeId, usize>,
    pub road_occupancy: BTreeMap<EdgeId, usize>,
    pub actions: Vec<GameAction>,
    available_actions: Vec<GameAction>,
    setup_pending_roads: HashMap<usize, NodeId>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        if !(2..=Color::ORDERED.len()).contains(&config.max_players) {
            return Err(GameError::InvalidConfig("max_players must be between 2 and 4"));
        }
        if config.num_players < 2 {
            return Err(GameError::InvalidConfig("at least two players are needed"));
        }
        let occupied: Vec<usize> = (0..config.max_players)
            .filter(|seat| !config.vacant_seats.contains(seat))
            .take(config.num_players)
            .collect();
        if occupied.len() < config.num_players {
            return Err(GameError::InvalidConfig("not enough open seats"));
        }
        if !occupied.contains(&config.first_player) {
            return Err(GameError::InvalidConfig("first player must sit in an occupied seat"));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let map = CatanMap::build_with_rng(config.map_type, &mut rng)?;
        let seats = (0..config.max_players)
            .map(|seat| {
                occupied
                    .contains(&seat)
                    .then(|| PlayerState::new(seat, Color::ORDERED[seat], &map))
            })
            .collect::<Vec<_>>();

        let order = clockwise_from(config.first_player, &seats);
        let setup_state = SetupState::new(&order);
        let pending_prompt = setup_state
            .current_prompt()
            .unwrap_or(ActionPrompt::PlayTurn);
        let current_player = setup_state
            .current_player()
            .unwrap_or(config.first_player);

        let mut state = Self {
            config,
            map,
            seats,
            phase: GamePhase::Setup(setup_state),
            pending_prompt,
            current_player,
            node_occupancy: BTreeMap::new(),
            road_occupancy: BTreeMap::new(),
            actions: Vec::new(),
            available_actions: Vec::new(),
            setup_pending_roads: HashMap::new(),
        };
        state.refresh_available_actions();
        Ok(state)
    }

    pub fn player(&self, seat: usize) -> Option<&PlayerState> {
        self.seats.get(seat).and_then(Option::as_ref)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> + '_ {
        self.seats.iter().flatten()
    }

    pub fn num_players(&self) -> usize {
        self.players().count()
    }

    pub fn setup_phase(&self) -> SetupPhase {
        match &self.phase {
            GamePhase::Setup(state) => state.phase(),
            GamePhase::Playing => SetupPhase::Done,
        }
    }

    pub fn first_player(&self) -> usize {
        self.config.first_player
    }

    pub fn is_seat_vacant(&self, seat: usize) -> bool {
        self.player(seat).is_none()
    }

    pub fn max_players(&self) -> usize {
        self.seats.len()
    }

    pub fn is_setup_complete(&self) -> bool {
        matches!(self.phase, GamePhase::Playing)
    }

    pub fn step(&mut self, action: GameAction) -> Result<StepOutcome, GameError> {
        if self.player(action.player_index).is_none() {
            return Err(GameError::InvalidPlayer(action.player_index));
        }
        let mut outcome = StepOutcome::default();
        self.handle_setup_action(&action, &mut outcome)?;
        self.actions.push(action);
        self.refresh_available_actions();
        Ok(outcome)
    }

    fn handle_setup_action(
        &mut self,
        action: &GameAction,
        outcome: &mut StepOutcome,
    ) -> Result<(), GameError> {
        let (current_player, prompt, is_second_settlement) = match &self.phase {
            GamePhase::Setup(state) => (
                state.current_player().ok_or(GameError::SetupFinished)?,
                state.current_prompt().unwrap_or(ActionPrompt::PlayTurn),
                state.phase() == SetupPhase::SecondSettlement,
            ),
            GamePhase::Playing => return Err(GameError::SetupFinished),
        };

        if current_player != action.player_index {
            return Err(GameError::ActionOutOfTurn {
                expected: current_player,
                actual: action.player_index,
            });
        }
        match (prompt, action.action_type) {
            (ActionPrompt::BuildInitialSettlement, ActionType::BuildSettlement) => {
                let node_id = match action.payload {
                    ActionPayload::Node(node) => node,
                    _ => return Err(GameError::InvalidPayload("expected node id")),
                };
                self.validate_settlement_location(node_id)?;
                self.place_settlement(action.player_index, node_id);
                if is_second_settlement {
                    self.award_starting_resources(action.player_index, node_id, outcome);
                }
                self.setup_pending_roads
                    .insert(action.player_index, node_id);
                outcome.events.push(GameEvent::BuiltSettlement {
                    player: action.player_index,
                    node: node_id,
                });
            }
            (ActionPrompt::BuildInitialRoad, ActionType::BuildRoad) => {
                let edge = match action.payload {
                    ActionPayload::Edge(edge) => normalize_edge(edge),
                    _ => return Err(GameError::InvalidPayload("expected edge id")),
                };
                let anchor = self
                    .setup_pending_roads
                    .get(&action.player_index)
                    .copied()
                    .ok_or(GameError::RoadNotAtSettlement)?;
                if edge.0 != anchor && edge.1 != anchor {
                    return Err(GameError::RoadNotAtSettlement);
                }
                self.validate_road_location(edge)?;
                self.place_road(action.player_index, edge);
                self.setup_pending_roads.remove(&action.player_index);
                outcome.events.push(GameEvent::BuiltRoad {
                    player: action.player_index,
                    edge,
                });
            }
            _ => {
                return Err(GameError::InvalidPrompt {
                    prompt,
                    action: action.action_type,
                });
            }
        }

        let GamePhase::Setup(state) = &mut self.phase else {
            return Err(GameError::SetupFinished);
        };
        state.advance();
        match (state.current_player(), state.current_prompt()) {
            (Some(next_player), Some(next_prompt)) => {
                self.current_player = next_player;
                self.pending_prompt = next_prompt;
            }
            _ => {
                self.phase = GamePhase::Playing;
                self.current_player = self.config.first_player;
                self.pending_prompt = ActionPrompt::PlayTurn;
                outcome.events.push(GameEvent::SetupCompleted);
            }
        }
        Ok(())
    }

    fn validate_settlement_location(&self, node_id: NodeId) -> Result<(), GameError> {
        if !self.map.is_land_node(node_id) {
            return Err(GameError::NodeNotFound(node_id));
        }
        if self.node_occupancy.contains_key(&node_id) {
            return Err(GameError::NodeOccupied(node_id));
        }
        if self
            .map
            .neighbors_of(node_id)
            .any(|neighbor| self.node_occupancy.contains_key(&neighbor))
        {
            return Err(GameError::DistanceRuleViolation);
        }
        Ok(())
    }

    fn validate_road_location(&self, edge: EdgeId) -> Result<(), GameError> {
        if self.road_occupancy.contains_key(&edge) {
            return Err(GameError::EdgeOccupied);
        }
        if !self.map.are_adjacent(edge.0, edge.1) {
            return Err(GameError::EdgeNotFound);
        }
        Ok(())
    }

    fn place_settlement(&mut self, player_idx: usize, node_id: NodeId) {
        self.node_occupancy.insert(node_id, player_idx);
        let map = &self.map;
        for (seat, player) in self.seats.iter_mut().enumerate() {
            let Some(player) = player else {
                continue;
            };
            if seat == player_idx {
                player.add_settlement(map, node_id);
            }
            player.block_around(map, node_id);
        }
    }

    fn place_road(&mut self, player_idx: usize, edge: EdgeId) {
        self.road_occupancy.insert(edge, player_idx);
        if let Some(Some(player)) = self.seats.get_mut(player_idx) {
            player.add_road(edge);
        }
    }

    fn award_starting_resources(
        &mut self,
        player_idx: usize,
        node_id: NodeId,
        outcome: &mut StepOutcome,
    ) {
        let mut bundle = ResourceBundle::zero();
        for tile in self.map.producing_tiles(node_id) {
            if let Some(resource) = tile.resource {
                bundle.add(resource, 1);
            }
        }
        if bundle.is_empty() {
            return;
        }
        if let Some(Some(player)) = self.seats.get_mut(player_idx) {
            for (resource, amount) in bundle.iter() {
                player.resources.add(resource, amount);
            }
            outcome.events.push(GameEvent::ResourcesDistributed {
                player: player_idx,
                bundle,
            });
        }
    }

    pub fn legal_actions(&self) -> &[GameAction] {
        &self.available_actions
    }

    fn refresh_available_actions(&mut self) {
        self.available_actions = match &self.phase {
            GamePhase::Setup(state) => self.legal_setup_actions(state),
            GamePhase::Playing => Vec::new(),
        };
    }

    fn legal_setup_actions(&self, state: &SetupState) -> Vec<GameAction> {
        let mut actions = Vec::new();
        let Some(player_idx) = state.current_player() else {
            return actions;
        };
        match state.current_prompt() {
            Some(ActionPrompt::BuildInitialSettlement) => {
                for node in &self.map.land_nodes {
                    if self.validate_settlement_location(*node).is_ok() {
                        actions.push(GameAction::settlement(player_idx, *node));
                    }
                }
            }
            Some(ActionPrompt::BuildInitialRoad) => {
                if let Some(&anchor) = self.setup_pending_roads.get(&player_idx) {
                    for edge in self.map.node_edges.get(&anchor).into_iter().flatten() {
                        if self.validate_road_location(*edge).is_ok() {
                            actions.push(GameAction::road(player_idx, *edge));
                        }
                    }
                }
            }
            _ => {}
        }
        actions
    }
}

impl SetupView for GameState {
    fn setup_phase(&self) -> SetupPhase {
        GameState::setup_phase(self)
    }

    fn current_player(&self) -> usize {
        self.current_player
    }

    fn first_player(&self) -> usize {
        GameState::first_player(self)
    }

    fn is_seat_vacant(&self, seat: usize) -> bool {
        GameState::is_seat_vacant(self, seat)
    }

    fn max_players(&self) -> usize {
        GameState::max_players(self)
    }

    fn is_road_free(&self, edge: EdgeId) -> bool {
        !self.road_occupancy.contains_key(&normalize_edge(edge))
    }
}

/// Occupied seats in turn order, starting at `first`.
fn clockwise_from(first: usize, seats: &[Option<PlayerState>]) -> Vec<usize> {
    let max = seats.len();
    (0..max)
        .map(|offset| (first + offset) % max)
        .filter(|seat| seats[*seat].is_some())
        .collect()
}

#[derive(Debug, Clone)]
pub struct SetupState {
    steps: Vec<SetupStep>,
    cursor: usize,
}

#[derive(Debug, Clone)]
struct SetupStep {
    player_index: usize,
    prompt: ActionPrompt,
    second_round: bool,
}

impl SetupState {
    /// First round in `order`, second round in reverse.
    fn new(order: &[usize]) -> Self {
        let mut steps = Vec::with_capacity(order.len() * 4);
        let rounds = [(false, order.to_vec()), (true, order.iter().rev().copied().collect())];
        for (second_round, seats) in rounds {
            for player_index in seats {
                for prompt in [ActionPrompt::BuildInitialSettlement, ActionPrompt::BuildInitialRoad] {
                    steps.push(SetupStep {
                        player_index,
                        prompt,
                        second_round,
                    });
                }
            }
        }
        Self { steps, cursor: 0 }
    }

    fn current_prompt(&self) -> Option<ActionPrompt> {
        self.steps.get(self.cursor).map(|step| step.prompt)
    }

    fn current_player(&self) -> Option<usize> {
        self.steps.get(self.cursor).map(|step| step.player_index)
    }

    fn phase(&self) -> SetupPhase {
        match self.steps.get(self.cursor) {
            None => SetupPhase::Done,
            Some(step) => match (step.second_round, step.prompt) {
                (false, ActionPrompt::BuildInitialSettlement) => SetupPhase::FirstSettlement,
                (false, _) => SetupPhase::FirstRoad,
                (true, ActionPrompt::BuildInitialSettlement) => SetupPhase::SecondSettlement,
                (true, _) => SetupPhase::SecondRoad,
            },
        }
    }

    fn advance(&mut self) {
        if self.cursor < self.steps.len() {
            self.cursor += 1;
        }
    }
}
