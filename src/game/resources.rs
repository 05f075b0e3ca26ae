use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{PieceType, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceBundle {
    counts: [u8; Resource::ALL.len()],
}

impl Default for ResourceBundle {
    fn default() -> Self {
        Self::zero()
    }
}

impl ResourceBundle {
    pub const fn from_counts(counts: [u8; 5]) -> Self {
        Self { counts }
    }

    pub const fn zero() -> Self {
        Self {
            counts: [0; Resource::ALL.len()],
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&v| v as u32).sum()
    }

    pub fn add(&mut self, resource: Resource, amount: u8) {
        let idx = resource.index();
        self.counts[idx] = self.counts[idx].saturating_add(amount);
    }

    pub fn subtract(&mut self, resource: Resource, amount: u8) -> Result<(), ResourceError> {
        let idx = resource.index();
        if self.counts[idx] < amount {
            return Err(ResourceError::InsufficientResource {
                resource,
                available: self.counts[idx],
                requested: amount,
            });
        }
        self.counts[idx] -= amount;
        Ok(())
    }

    pub fn can_afford(&self, other: &ResourceBundle) -> bool {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .all(|(have, need)| have >= need)
    }

    /// How many of `resource` are held beyond what `target` asks for.
    pub fn surplus(&self, target: &ResourceBundle, resource: Resource) -> u8 {
        self.get(resource).saturating_sub(target.get(resource))
    }

    /// How many of `resource` are still missing to cover `target`.
    pub fn shortfall(&self, target: &ResourceBundle, resource: Resource) -> u8 {
        target.get(resource).saturating_sub(self.get(resource))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&value| value == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u8)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }

    pub fn get(&self, resource: Resource) -> u8 {
        self.counts[resource.index()]
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        for (resource, amount) in self.iter() {
            if amount > 0 {
                parts.push(format!("{amount}x{resource}"));
            }
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("insufficient {resource:?}: have {available}, need {requested}")]
    InsufficientResource {
        resource: Resource,
        available: u8,
        requested: u8,
    },
}

pub const COST_ROAD: ResourceBundle = ResourceBundle::from_counts([1, 1, 0, 0, 0]);
pub const COST_SETTLEMENT: ResourceBundle = ResourceBundle::from_counts([1, 1, 1, 1, 0]);
pub const COST_CITY: ResourceBundle = ResourceBundle::from_counts([0, 0, 0, 2, 3]);
pub const COST_DEVELOPMENT: ResourceBundle = ResourceBundle::from_counts([0, 0, 1, 1, 1]);

/// Resources needed to build (or buy) `piece`.
pub const fn target_set(piece: PieceType) -> ResourceBundle {
    match piece {
        PieceType::Settlement => COST_SETTLEMENT,
        PieceType::City => COST_CITY,
        PieceType::Card => COST_DEVELOPMENT,
        PieceType::Road => COST_ROAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surplus_and_shortfall() {
        let mut hand = ResourceBundle::from_counts([3, 0, 1, 0, 0]);
        assert_eq!(hand.surplus(&COST_SETTLEMENT, Resource::Wood), 2);
        assert_eq!(hand.shortfall(&COST_SETTLEMENT, Resource::Brick), 1);
        assert_eq!(hand.shortfall(&COST_SETTLEMENT, Resource::Sheep), 0);
        assert!(!hand.can_afford(&COST_SETTLEMENT));
        hand.add(Resource::Brick, 1);
        hand.add(Resource::Wheat, 1);
        assert!(hand.can_afford(&COST_SETTLEMENT));
    }

    #[test]
    fn subtract_refuses_overdraw() {
        let mut hand = ResourceBundle::from_counts([1, 0, 0, 0, 0]);
        assert!(hand.subtract(Resource::Brick, 1).is_err());
        assert!(hand.subtract(Resource::Wood, 1).is_ok());
        assert!(hand.is_empty());
    }

    #[test]
    fn target_sets_cover_every_piece() {
        assert_eq!(target_set(PieceType::City).total(), 5);
        assert_eq!(target_set(PieceType::Card).total(), 3);
        assert_eq!(target_set(PieceType::Road).total(), 2);
        assert_eq!(target_set(PieceType::Settlement).to_string(), "1xWOOD, 1xBRICK, 1xSHEEP, 1xWHEAT");
    }
}
