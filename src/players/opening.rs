use std::cell::RefCell;

use log::warn;
use uuid::Uuid;

use crate::board::normalize_edge;
use crate::game::action::{ActionPayload, GameAction};
use crate::game::game::Game;
use crate::game::state::SetupPhase;
use crate::planner::{OpeningPlanner, PlannerConfig, PlannerError};
use crate::players::BasePlayer;

/// Robot that places its opening with the [`OpeningPlanner`].
#[derive(Debug, Default)]
pub struct OpeningPlayer {
    planner: RefCell<OpeningPlanner>,
    /// Game the planner's board caches belong to.
    game_id: RefCell<Option<Uuid>>,
}

impl OpeningPlayer {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            planner: RefCell::new(OpeningPlanner::new(config)),
            game_id: RefCell::new(None),
        }
    }

    fn plan(&self, game: &Game) -> Result<Option<ActionPayload>, PlannerError> {
        if self.game_id.replace(Some(game.id)) != Some(game.id) {
            self.planner.borrow_mut().reset_board();
        }
        let planner = self.planner.borrow();
        let state = &game.state;
        let Some(player) = state.player(state.current_player) else {
            return Ok(None);
        };
        let payload = match state.setup_phase() {
            SetupPhase::FirstSettlement => {
                let pair = planner.plan_initial_settlements(&state.map, player)?;
                ActionPayload::Node(pair.first)
            }
            SetupPhase::SecondSettlement => {
                ActionPayload::Node(planner.plan_second_settlement(&state.map, player)?)
            }
            SetupPhase::FirstRoad | SetupPhase::SecondRoad => {
                ActionPayload::Edge(planner.plan_initial_road(&state.map, player, state)?)
            }
            SetupPhase::Done => return Ok(None),
        };
        Ok(Some(payload))
    }
}

impl BasePlayer for OpeningPlayer {
    fn decide(&self, game: &Game, actions: &[GameAction]) -> Option<GameAction> {
        let payload = match self.plan(game) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("planner failed ({err}); taking first legal action");
                None
            }
        };
        let chosen = payload.as_ref().and_then(|payload| {
            actions.iter().find(|action| match (&action.payload, payload) {
                (ActionPayload::Edge(a), ActionPayload::Edge(b)) => {
                    normalize_edge(*a) == normalize_edge(*b)
                }
                (a, b) => a == b,
            })
        });
        if chosen.is_none() && payload.is_some() {
            warn!("planned {payload:?} is not legal; taking first legal action");
        }
        chosen.or_else(|| actions.first()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    #[test]
    fn plays_a_full_setup() {
        let mut game = Game::new(GameConfig::default()).expect("game");
        let players: Vec<OpeningPlayer> = (0..4).map(|_| OpeningPlayer::default()).collect();
        game.play_setup(&players).expect("setup completes");
        for player in game.state.players() {
            assert_eq!(player.settlements.len(), 2);
            assert_eq!(player.roads.len(), 2);
        }
    }

    #[test]
    fn first_settlement_matches_planner() {
        let game = Game::new(GameConfig::default()).expect("game");
        let robot = OpeningPlayer::default();
        let action = robot
            .decide(&game, game.state.legal_actions())
            .expect("an action");
        let seat = game.state.current_player;
        let player = game.state.player(seat).expect("seated");
        let pair = OpeningPlanner::default()
            .plan_initial_settlements(&game.state.map, player)
            .expect("pair");
        assert_eq!(action, GameAction::settlement(seat, pair.first));
    }
}
