use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::board::{CatanMap, NodeId, dice_ways, number_weight};
use crate::types::Resource;

/// Dice numbers a player's settlements touch, with the resource and hex
/// each one pays out from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNumbers {
    by_number: BTreeMap<u8, BTreeSet<(Resource, u16)>>,
}

impl PlayerNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile of a single node, as if it were the only settlement.
    pub fn for_node(map: &CatanMap, node: NodeId) -> Self {
        let mut numbers = Self::new();
        numbers.add_node(map, node);
        numbers
    }

    pub fn add_node(&mut self, map: &CatanMap, node: NodeId) {
        for tile in map.producing_tiles(node) {
            if let (Some(resource), Some(number)) = (tile.resource, tile.number) {
                self.add(number, resource, tile.id);
            }
        }
    }

    pub fn add(&mut self, number: u8, resource: Resource, hex: u16) {
        self.by_number
            .entry(number)
            .or_default()
            .insert((resource, hex));
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    pub fn has_number(&self, number: u8) -> bool {
        self.by_number.contains_key(&number)
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.by_number.keys().copied()
    }

    /// Dice outcomes (out of 36) paying out `resource`, counting every
    /// contributing hex separately.
    pub fn ways_for_resource(&self, resource: Resource) -> u32 {
        self.by_number
            .iter()
            .map(|(number, sources)| {
                let hexes = sources.iter().filter(|(r, _)| *r == resource).count() as u32;
                hexes * dice_ways(*number)
            })
            .sum()
    }

    /// Sum of number weights over all contributing hexes.
    pub fn total_weight(&self) -> u32 {
        self.by_number
            .iter()
            .map(|(number, sources)| number_weight(*number) * sources.len() as u32)
            .sum()
    }
}

/// Which maritime ports a player can trade at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortFlags {
    pub misc: bool,
    pub resources: [bool; Resource::ALL.len()],
}

impl PortFlags {
    pub fn for_node(map: &CatanMap, node: NodeId) -> Self {
        let mut flags = Self::default();
        flags.add_node(map, node);
        flags
    }

    pub fn add_node(&mut self, map: &CatanMap, node: NodeId) {
        match map.port_at(node) {
            Some(None) => self.misc = true,
            Some(Some(resource)) => self.resources[resource.index()] = true,
            None => {}
        }
    }

    pub fn has(&self, kind: Option<Resource>) -> bool {
        match kind {
            None => self.misc,
            Some(resource) => self.resources[resource.index()],
        }
    }

    /// Resources handed over for one of another kind.
    pub fn trade_ratio(&self, give: Resource) -> u8 {
        if self.resources[give.index()] {
            2
        } else if self.misc {
            3
        } else {
            4
        }
    }

    pub fn union(self, other: PortFlags) -> PortFlags {
        let mut resources = self.resources;
        for (slot, theirs) in resources.iter_mut().zip(other.resources) {
            *slot |= theirs;
        }
        PortFlags {
            misc: self.misc || other.misc,
            resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ways_count_each_hex() {
        let mut numbers = PlayerNumbers::new();
        numbers.add(6, Resource::Wheat, 1);
        numbers.add(6, Resource::Wheat, 2);
        numbers.add(8, Resource::Ore, 3);
        assert_eq!(numbers.ways_for_resource(Resource::Wheat), 10);
        assert_eq!(numbers.ways_for_resource(Resource::Ore), 5);
        assert_eq!(numbers.ways_for_resource(Resource::Wood), 0);
        assert_eq!(numbers.total_weight(), 42);
    }

    #[test]
    fn same_hex_is_counted_once() {
        let mut numbers = PlayerNumbers::new();
        numbers.add(5, Resource::Brick, 4);
        numbers.add(5, Resource::Brick, 4);
        assert_eq!(numbers.ways_for_resource(Resource::Brick), 4);
        assert_eq!(numbers.total_weight(), 11);
        numbers.add(5, Resource::Wood, 7);
        assert_eq!(numbers.total_weight(), 22);
        assert_eq!(numbers.numbers().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn trade_ratio_prefers_specific_port() {
        let mut flags = PortFlags::default();
        assert_eq!(flags.trade_ratio(Resource::Ore), 4);
        flags.misc = true;
        assert_eq!(flags.trade_ratio(Resource::Ore), 3);
        flags.resources[Resource::Ore.index()] = true;
        assert_eq!(flags.trade_ratio(Resource::Ore), 2);
        assert_eq!(flags.trade_ratio(Resource::Wood), 3);
        assert!(flags.has(Some(Resource::Ore)));
        assert!(!flags.has(Some(Resource::Wood)));
    }
}
