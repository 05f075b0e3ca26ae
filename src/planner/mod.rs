//! Opening placement planning: where a robot puts its two initial
//! settlements and the roads that go with them.

pub mod arena;
pub mod opening;
pub mod possibility;
pub mod rarity;
pub mod scoring;

use serde::{Deserialize, Serialize};

use crate::board::NodeId;
use crate::estimate::DEFAULT_ROLL_LIMIT;

pub use arena::{Claimant, SimArena, SnapshotId};
pub use opening::{OpeningPlan, OpeningPlanner, SettlementPair, count_enemy_builds};
pub use possibility::{BuildPossibility, PlanAction, PlanTree, PossibilityId};
pub use rarity::{RarityCache, ResourceRarity, estimate_resource_rarity};
pub use scoring::NodeScores;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Per-piece roll cutoff. The pair search starts from four times this.
    pub roll_limit: u32,
    /// Cutoff used when ordering the chosen pair.
    pub order_roll_limit: u32,
    pub misc_port_weight: f32,
    /// Minimum rarity for a 2:1 port to be worth scoring.
    pub port_rarity_threshold: u32,
    pub port_rarity_divisor: f32,
    /// Simulate enemy settlements before picking the first road.
    pub lookahead: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            roll_limit: DEFAULT_ROLL_LIMIT,
            order_roll_limit: 300,
            misc_port_weight: 0.5,
            port_rarity_threshold: 33,
            port_rarity_divisor: 56.0,
            lookahead: true,
        }
    }
}

impl PlannerConfig {
    pub fn pair_speed_limit(&self) -> u32 {
        4 * self.roll_limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("no legal placement found")]
    NoPlacementFound,
    #[error("player has no settlement to build a road from")]
    NoSettlement,
    #[error("node {0} is not on the board")]
    UnknownNode(NodeId),
    #[error("node {0} is no longer available")]
    NodeUnavailable(NodeId),
    #[error("unknown snapshot {0}")]
    UnknownSnapshot(SnapshotId),
}
