use crate::game::action::GameAction;
use crate::game::game::Game;
use crate::planner::PlannerConfig;
use crate::players::{BasePlayer, OpeningPlayer, RandomPlayer};

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Chooses placements at random.",
    },
    CliPlayer {
        code: "O",
        name: "OpeningPlayer",
        description: "Plans settlements by building speed and roads with enemy look-ahead. Param 'nolook' disables the look-ahead.",
    },
];

pub enum PlayerInstance {
    Random(RandomPlayer),
    Opening(OpeningPlayer),
}

impl PlayerInstance {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerInstance::Random(_) => "Random",
            PlayerInstance::Opening(_) => "Opening",
        }
    }
}

impl BasePlayer for PlayerInstance {
    fn decide(&self, game: &Game, actions: &[GameAction]) -> Option<GameAction> {
        match self {
            PlayerInstance::Random(p) => p.decide(game, actions),
            PlayerInstance::Opening(p) => p.decide(game, actions),
        }
    }
}

/// Build the player for `code`, e.g. `O` or `O:nolook`.
pub fn create_player(code: &str, params: &[&str], config: &PlannerConfig) -> Option<PlayerInstance> {
    match code {
        "R" => Some(PlayerInstance::Random(RandomPlayer)),
        "O" => {
            let mut config = config.clone();
            if params.iter().any(|p| p.eq_ignore_ascii_case("nolook")) {
                config.lookahead = false;
            }
            Some(PlayerInstance::Opening(OpeningPlayer::new(config)))
        }
        _ => None,
    }
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}
