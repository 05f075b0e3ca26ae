use crate::game::{action::GameAction, game::Game};

pub trait BasePlayer {
    /// Pick one of `actions`, which are legal in `game`'s current state.
    fn decide(&self, game: &Game, actions: &[GameAction]) -> Option<GameAction>;
}
