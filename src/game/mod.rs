pub mod action;
pub mod game;
pub mod players;
pub mod resources;
pub mod state;

pub use action::{ActionPayload, GameAction};
pub use game::Game;
pub use players::PlayerState;
pub use resources::{
    COST_CITY, COST_DEVELOPMENT, COST_ROAD, COST_SETTLEMENT, ResourceBundle, ResourceError,
    target_set,
};
pub use state::{
    GameConfig, GameError, GameEvent, GamePhase, GameState, SetupPhase, SetupView, StepOutcome,
};
