//! Building speed estimation: how many dice rolls a production profile
//! needs before it can afford each kind of piece.

use serde::{Deserialize, Serialize};

use crate::game::resources::{ResourceBundle, target_set};
use crate::numbers::{PlayerNumbers, PortFlags};
use crate::types::{PieceType, Resource};

/// Rolls-per-resource for a resource nothing produces.
pub const NEVER_PRODUCED: u32 = 1000;

/// Default upper bound on a single estimate.
pub const DEFAULT_ROLL_LIMIT: u32 = 40;

/// Outcome of one bounded estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollEstimate {
    Within(u32),
    CutoffExceeded { partial: u32 },
}

impl RollEstimate {
    /// Rolls, with an exceeded estimate charged at `penalty`.
    pub fn or_penalty(self, penalty: u32) -> u32 {
        match self {
            RollEstimate::Within(rolls) => rolls,
            RollEstimate::CutoffExceeded { .. } => penalty,
        }
    }

    pub fn is_within(self) -> bool {
        matches!(self, RollEstimate::Within(_))
    }
}

/// Anything able to estimate the rolls needed for a target set.
pub trait RollEstimator {
    fn rolls_for(&self, piece: PieceType, cutoff: u32) -> RollEstimate;
}

/// Result of summing the four piece estimates under a shared cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSpeed {
    pub speed: u32,
    /// Every piece was estimated without hitting the cutoff.
    pub all_the_way: bool,
}

/// Sum the piece estimates in [`PieceType::ALL`] order, stopping as soon
/// as the running total reaches `best`. A cut-off estimate charges the
/// whole candidate at `best`.
pub fn pruned_speed(estimator: &impl RollEstimator, best: u32) -> AggregateSpeed {
    let mut speed = 0;
    for (idx, piece) in PieceType::ALL.into_iter().enumerate() {
        match estimator.rolls_for(piece, best) {
            RollEstimate::Within(rolls) => speed += rolls,
            RollEstimate::CutoffExceeded { .. } => {
                return AggregateSpeed {
                    speed: best,
                    all_the_way: false,
                };
            }
        }
        let last = idx + 1 == PieceType::ALL.len();
        if last {
            return AggregateSpeed {
                speed,
                all_the_way: true,
            };
        }
        if speed >= best {
            break;
        }
    }
    AggregateSpeed {
        speed,
        all_the_way: false,
    }
}

/// Rolls needed per resource for one production profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingSpeedEstimate {
    rolls_per_resource: [u32; Resource::ALL.len()],
    ports: PortFlags,
}

impl BuildingSpeedEstimate {
    pub fn new(numbers: &PlayerNumbers, ports: PortFlags) -> Self {
        let mut rolls_per_resource = [NEVER_PRODUCED; Resource::ALL.len()];
        for resource in Resource::ALL {
            let ways = numbers.ways_for_resource(resource);
            if ways > 0 {
                // round(36 / ways) without floats
                rolls_per_resource[resource.index()] = ((72 + ways) / (2 * ways)).max(1);
            }
        }
        Self {
            rolls_per_resource,
            ports,
        }
    }

    pub fn rolls_per_resource(&self, resource: Resource) -> u32 {
        self.rolls_per_resource[resource.index()]
    }

    /// Simulate expected production roll by roll until `target` is
    /// covered, trading surplus at the best available ratio.
    pub fn calculate_rolls_fast(
        &self,
        starting: &ResourceBundle,
        target: &ResourceBundle,
        cutoff: u32,
    ) -> RollEstimate {
        let mut ours = *starting;
        self.trade_surplus(&mut ours, target);
        let mut rolls = 0;
        while !ours.can_afford(target) {
            if rolls > cutoff {
                return RollEstimate::CutoffExceeded { partial: rolls };
            }
            rolls += 1;
            for resource in Resource::ALL {
                if rolls % self.rolls_per_resource[resource.index()] == 0 {
                    ours.add(resource, 1);
                }
            }
            self.trade_surplus(&mut ours, target);
        }
        RollEstimate::Within(rolls)
    }

    pub fn estimates_from_nothing_fast(&self, cutoff: u32) -> [RollEstimate; 4] {
        self.estimates_from_now_fast(&ResourceBundle::zero(), cutoff)
    }

    pub fn estimates_from_now_fast(
        &self,
        hand: &ResourceBundle,
        cutoff: u32,
    ) -> [RollEstimate; 4] {
        PieceType::ALL.map(|piece| self.calculate_rolls_fast(hand, &target_set(piece), cutoff))
    }

    /// Sum of all four estimates, charging `cutoff` for any that overrun.
    pub fn total_speed(&self, cutoff: u32) -> u32 {
        self.estimates_from_nothing_fast(cutoff)
            .iter()
            .map(|estimate| estimate.or_penalty(cutoff))
            .sum()
    }

    fn trade_surplus(&self, ours: &mut ResourceBundle, target: &ResourceBundle) {
        for give in Resource::ALL {
            let ratio = self.ports.trade_ratio(give);
            while ours.surplus(target, give) >= ratio {
                let Some(wanted) = self.most_needed(ours, target) else {
                    return;
                };
                if ours.subtract(give, ratio).is_err() {
                    break;
                }
                ours.add(wanted, 1);
            }
        }
    }

    /// The missing resource that takes longest to roll.
    fn most_needed(&self, ours: &ResourceBundle, target: &ResourceBundle) -> Option<Resource> {
        let mut best: Option<Resource> = None;
        for resource in Resource::ALL {
            if ours.shortfall(target, resource) == 0 {
                continue;
            }
            let slower = best.is_none_or(|current| {
                self.rolls_per_resource(resource) > self.rolls_per_resource(current)
            });
            if slower {
                best = Some(resource);
            }
        }
        best
    }
}

impl RollEstimator for BuildingSpeedEstimate {
    fn rolls_for(&self, piece: PieceType, cutoff: u32) -> RollEstimate {
        self.calculate_rolls_fast(&ResourceBundle::zero(), &target_set(piece), cutoff)
    }
}
