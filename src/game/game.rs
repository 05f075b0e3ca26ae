use log::debug;
use uuid::Uuid;

use crate::game::action::GameAction;
use crate::game::{GameConfig, GameError, GameState};
use crate::players::BasePlayer;

pub struct Game {
    pub seed: u64,
    pub id: Uuid,
    pub state: GameState,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Ok(Self {
            seed: config.seed,
            id: Uuid::new_v4(),
            state: GameState::new(config)?,
        })
    }

    /// Run both placement rounds. `players` is indexed by seat; entries
    /// for vacant seats are never asked.
    pub fn play_setup<P: BasePlayer>(&mut self, players: &[P]) -> Result<(), GameError> {
        while !self.state.is_setup_complete() {
            self.play_tick(players)?;
        }
        Ok(())
    }

    pub fn play_tick<P: BasePlayer>(&mut self, players: &[P]) -> Result<GameAction, GameError> {
        let current_idx = self.state.current_player;
        let player = players
            .get(current_idx)
            .ok_or(GameError::InvalidPlayer(current_idx))?;

        let legal_actions = self.state.legal_actions();
        if legal_actions.is_empty() {
            return Err(GameError::NoLegalAction(current_idx));
        }
        let action = player
            .decide(self, legal_actions)
            .ok_or(GameError::NoLegalAction(current_idx))?;
        debug!("game {} seat {current_idx} plays {action:?}", self.id);
        self.state.step(action.clone())?;
        Ok(action)
    }
}
