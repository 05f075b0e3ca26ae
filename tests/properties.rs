//! Property-based tests for the estimator, the node lattice and the planner.

use proptest::prelude::*;

use catan_opening::board::{CatanMap, MapType};
use catan_opening::coords::NodeCoord;
use catan_opening::estimate::{BuildingSpeedEstimate, RollEstimate};
use catan_opening::game::{PlayerState, ResourceBundle, target_set};
use catan_opening::numbers::{PlayerNumbers, PortFlags};
use catan_opening::planner::OpeningPlanner;
use catan_opening::planner::scoring::{NodeScores, score_numbers};
use catan_opening::types::{Color, PieceType, Resource};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Strategy: a production profile of up to six (number, resource, hex) entries.
fn numbers_strategy() -> impl Strategy<Value = PlayerNumbers> {
    let entry = (
        (2u8..=12).prop_filter("seven produces nothing", |n| *n != 7),
        0..Resource::ALL.len(),
        0u16..19,
    );
    prop::collection::vec(entry, 0..=6).prop_map(|entries| {
        let mut numbers = PlayerNumbers::new();
        for (number, resource, hex) in entries {
            numbers.add(number, Resource::ALL[resource], hex);
        }
        numbers
    })
}

fn piece_strategy() -> impl Strategy<Value = PieceType> {
    (0..PieceType::ALL.len()).prop_map(|idx| PieceType::ALL[idx])
}

fn hand_strategy() -> impl Strategy<Value = ResourceBundle> {
    prop::array::uniform5(0u8..4).prop_map(ResourceBundle::from_counts)
}

fn map_strategy() -> impl Strategy<Value = CatanMap> {
    (any::<u64>(), prop_oneof![Just(MapType::Base), Just(MapType::Tournament)]).prop_map(
        |(seed, map_type)| {
            let mut rng = StdRng::seed_from_u64(seed);
            CatanMap::build_with_rng(map_type, &mut rng).expect("map")
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // 1. Estimates never pass the cutoff by more than one roll
    #[test]
    fn estimate_respects_cutoff(
        numbers in numbers_strategy(),
        hand in hand_strategy(),
        piece in piece_strategy(),
        cutoff in 0u32..120,
    ) {
        let estimate = BuildingSpeedEstimate::new(&numbers, PortFlags::default());
        match estimate.calculate_rolls_fast(&hand, &target_set(piece), cutoff) {
            RollEstimate::Within(rolls) => prop_assert!(rolls <= cutoff + 1),
            RollEstimate::CutoffExceeded { partial } => prop_assert_eq!(partial, cutoff + 1),
        }
    }

    // 2. Raising the cutoff never changes an estimate that already fit
    #[test]
    fn estimate_is_stable_under_larger_cutoff(
        numbers in numbers_strategy(),
        piece in piece_strategy(),
        cutoff in 0u32..60,
        extra in 0u32..60,
    ) {
        let estimate = BuildingSpeedEstimate::new(&numbers, PortFlags::default());
        let target = target_set(piece);
        let tight = estimate.calculate_rolls_fast(&ResourceBundle::zero(), &target, cutoff);
        if tight.is_within() {
            let loose = estimate.calculate_rolls_fast(&ResourceBundle::zero(), &target, cutoff + extra);
            prop_assert_eq!(tight, loose);
        }
    }

    // 3. A hand that already covers the target needs zero rolls
    #[test]
    fn affordable_target_needs_no_rolls(numbers in numbers_strategy(), piece in piece_strategy()) {
        let estimate = BuildingSpeedEstimate::new(&numbers, PortFlags::default());
        let target = target_set(piece);
        prop_assert_eq!(estimate.calculate_rolls_fast(&target, &target, 0), RollEstimate::Within(0));
    }

    // 4. Every two-away destination has a via node adjacent to both ends
    #[test]
    fn via_links_both_ends(row in -20i32..20, col in -20i32..20) {
        let origin = NodeCoord::new(row, col);
        for destination in origin.two_away() {
            let via = origin.via(destination);
            prop_assert!(via.is_some(), "{origin} -> {destination}");
            let via = via.unwrap();
            prop_assert!(origin.is_adjacent(via));
            prop_assert!(via.is_adjacent(destination));
            prop_assert!(!origin.is_adjacent(destination));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // 5. The number pass stays within 0..=round(100 * weight)
    #[test]
    fn number_pass_is_bounded(map in map_strategy(), weight in 0.1f32..2.0, with_profile in any::<bool>()) {
        let profile = PlayerNumbers::for_node(&map, map.min_node_id().expect("nodes"));
        let mut scores = NodeScores::for_nodes(map.land_nodes.iter().copied());
        score_numbers(&map, &mut scores, with_profile.then_some(&profile), weight);
        let top = (100.0 * weight).round() as i32;
        for node in map.land_nodes.iter().copied() {
            let score = scores.get(node).expect("scored");
            prop_assert!((0..=top).contains(&score), "node {node} scored {score}");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    // 6. The chosen pair is legal and the planner is deterministic
    #[test]
    fn planned_pair_is_legal(map in map_strategy()) {
        let player = PlayerState::new(0, Color::Red, &map);
        let pair = OpeningPlanner::default()
            .plan_initial_settlements(&map, &player)
            .expect("pair");
        prop_assert_ne!(pair.first, pair.second);
        prop_assert!(!map.are_adjacent(pair.first, pair.second));
        prop_assert!(player.is_potential_settlement(pair.first));
        prop_assert!(player.is_potential_settlement(pair.second));

        let again = OpeningPlanner::default()
            .plan_initial_settlements(&map, &player)
            .expect("pair");
        prop_assert_eq!(pair, again);
    }
}
