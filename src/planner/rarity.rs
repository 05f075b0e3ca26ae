use once_cell::unsync::OnceCell;

use crate::board::{CatanMap, number_weight};
use crate::types::Resource;

/// Summed number weight of every hex producing each resource, indexed by
/// [`Resource::index`].
pub type ResourceRarity = [u32; Resource::ALL.len()];

pub fn estimate_resource_rarity(map: &CatanMap) -> ResourceRarity {
    let mut rarity = [0; Resource::ALL.len()];
    for tile in map.tiles_by_id.values() {
        if let (Some(resource), Some(number)) = (tile.resource, tile.number) {
            rarity[resource.index()] += number_weight(number);
        }
    }
    rarity
}

/// Rarity table computed on first use and kept until invalidated.
#[derive(Debug, Default)]
pub struct RarityCache {
    cell: OnceCell<ResourceRarity>,
}

impl RarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, map: &CatanMap) -> &ResourceRarity {
        self.cell.get_or_init(|| estimate_resource_rarity(map))
    }

    pub fn is_cached(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn invalidate(&mut self) {
        self.cell = OnceCell::new();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::board::{LandTile, Tile};
    use crate::coords::CubeCoord;
    use crate::types::NodeRef;

    fn land(id: u16, resource: Option<Resource>, number: Option<u8>) -> Tile {
        let nodes = [
            NodeRef::North,
            NodeRef::NorthEast,
            NodeRef::SouthEast,
            NodeRef::South,
            NodeRef::SouthWest,
            NodeRef::NorthWest,
        ]
        .into_iter()
        .enumerate()
        .map(|(idx, node_ref)| (node_ref, id * 6 + idx as u16))
        .collect();
        Tile::Land(LandTile {
            id,
            resource,
            number,
            nodes,
            edges: HashMap::new(),
        })
    }

    fn sparse_map() -> CatanMap {
        let tiles = HashMap::from([
            (CubeCoord::new(0, 0, 0), land(0, Some(Resource::Wheat), Some(6))),
            (CubeCoord::new(3, -3, 0), land(1, Some(Resource::Wheat), Some(3))),
            (CubeCoord::new(-3, 3, 0), land(2, Some(Resource::Ore), Some(12))),
            (CubeCoord::new(0, 3, -3), land(3, None, None)),
        ]);
        CatanMap::from_tiles(tiles).expect("isolated hexes form a valid board")
    }

    #[test]
    fn sums_number_weights_per_resource() {
        let rarity = estimate_resource_rarity(&sparse_map());
        assert_eq!(rarity[Resource::Wheat.index()], 14 + 6);
        assert_eq!(rarity[Resource::Ore.index()], 3);
    }

    #[test]
    fn missing_resource_is_exactly_zero() {
        let rarity = estimate_resource_rarity(&sparse_map());
        assert_eq!(rarity[Resource::Wood.index()], 0);
        assert_eq!(rarity[Resource::Brick.index()], 0);
        assert_eq!(rarity[Resource::Sheep.index()], 0);
    }

    #[test]
    fn cache_computes_once_until_invalidated() {
        let map = sparse_map();
        let mut cache = RarityCache::new();
        assert!(!cache.is_cached());
        let first = *cache.get(&map);
        assert!(cache.is_cached());
        assert_eq!(*cache.get(&map), first);
        cache.invalidate();
        assert!(!cache.is_cached());
    }
}
