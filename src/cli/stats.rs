use std::collections::HashMap;
use std::time::Duration;

use crate::estimate::BuildingSpeedEstimate;
use crate::game::game::Game;
use crate::types::Color;

/// Cutoff used when rating a finished opening.
const RATING_ROLL_LIMIT: u32 = 300;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    /// Games in which the color ended setup with the fastest production.
    pub fastest: HashMap<Color, u32>,
    pub speeds_by_player: HashMap<Color, Vec<u32>>,
    pub weights_by_player: HashMap<Color, Vec<u32>>,
    pub ports_by_player: HashMap<Color, u32>,
    pub games: u32,
    pub total_ticks: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &Game, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_ticks += game.state.actions.len() as u64;

        let mut fastest: Option<(Color, u32)> = None;
        for player in game.state.players() {
            let speed = BuildingSpeedEstimate::new(player.numbers(), player.ports())
                .total_speed(RATING_ROLL_LIMIT);
            if fastest.is_none_or(|(_, best)| speed < best) {
                fastest = Some((player.color, speed));
            }
            self.speeds_by_player
                .entry(player.color)
                .or_default()
                .push(speed);
            self.weights_by_player
                .entry(player.color)
                .or_default()
                .push(player.numbers().total_weight());
            let ports = player.ports();
            let owned = ports.resources.iter().filter(|has| **has).count() as u32 + u32::from(ports.misc);
            *self.ports_by_player.entry(player.color).or_insert(0) += owned;
        }
        if let Some((color, _)) = fastest {
            *self.fastest.entry(color).or_insert(0) += 1;
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        for (color, count) in other.fastest {
            *self.fastest.entry(color).or_insert(0) += count;
        }
        for (color, speeds) in other.speeds_by_player {
            self.speeds_by_player.entry(color).or_default().extend(speeds);
        }
        for (color, weights) in other.weights_by_player {
            self.weights_by_player.entry(color).or_default().extend(weights);
        }
        for (color, ports) in other.ports_by_player {
            *self.ports_by_player.entry(color).or_insert(0) += ports;
        }
        self.games += other.games;
        self.total_ticks += other.total_ticks;
        self.total_duration += other.total_duration;
    }

    pub fn avg_speed(&self, color: Color) -> f64 {
        average(self.speeds_by_player.get(&color))
    }

    pub fn avg_weight(&self, color: Color) -> f64 {
        average(self.weights_by_player.get(&color))
    }

    pub fn get_avg_ticks(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_ticks as f64 / self.games as f64
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

fn average(values: Option<&Vec<u32>>) -> f64 {
    match values {
        Some(values) if !values.is_empty() => {
            values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
        }
        _ => 0.0,
    }
}

#[derive(Debug, Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, game: &Game, duration: Duration) {
        self.stats.record_game(game, duration);
    }
}
