#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod coords;
pub mod estimate;
pub mod game;
pub mod numbers;
pub mod planner;
pub mod players;
pub mod types;

pub use board::CatanMap;
pub use board::MapType;
pub use board::Tile;
pub use game::{Game, GameConfig, GameState, PlayerState, SetupPhase};
pub use planner::{OpeningPlan, OpeningPlanner, PlannerConfig, PlannerError};
pub use types::Color;
