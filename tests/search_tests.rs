//! Tests for the location combination search.

use std::collections::{BTreeMap, HashMap};

use craftmax::error::PlanError;
use craftmax::models::{
    Combination, EffectiveYieldRow, EffectiveYieldTable, Group, GroupDefinition, RankingMode,
    SearchConfig, SimplifiedEquations,
};
use craftmax::search::{
    aggregate_yield, count_combinations, group_subsets, location_combinations, normalize_ratios,
    score_combination, search, supply_ratios, BoundedTopK,
};

fn groups(layout: &[(&str, &[&str])]) -> GroupDefinition {
    GroupDefinition::new(
        layout
            .iter()
            .map(|(name, locations)| Group {
                name: name.to_string(),
                locations: locations.iter().map(|l| l.to_string()).collect(),
            })
            .collect(),
    )
    .unwrap()
}

fn six_groups() -> GroupDefinition {
    groups(&[
        ("religion", &["Church", "Temple"]),
        ("dark", &["Slum", "Pawnshop", "Alley"]),
        ("aqua", &["Lighthouse", "Pond", "Sandbar", "Harbor"]),
        ("young", &["Hotel", "Cemetery", "School", "Hospital"]),
        ("fit", &["Well", "Tunnel", "Forest"]),
        ("strange", &["Laboratory"]),
    ])
}

fn yield_table(rows: &[(&str, &[(&str, f64)])]) -> EffectiveYieldTable {
    EffectiveYieldTable {
        rows: rows
            .iter()
            .map(|(ingredient, cells)| EffectiveYieldRow {
                ingredient: ingredient.to_string(),
                by_location: cells
                    .iter()
                    .map(|(l, v)| (l.to_string(), *v))
                    .collect::<HashMap<_, _>>(),
            })
            .collect(),
    }
}

fn combination(locations: &[&str]) -> Combination {
    Combination {
        groups: Vec::new(),
        locations: locations.iter().map(|l| l.to_string()).collect(),
    }
}

fn demand(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// ---------------------------------------------------------------------------
// BoundedTopK
// ---------------------------------------------------------------------------

#[test]
fn test_top_k_never_exceeds_capacity() {
    let mut top = BoundedTopK::new(5);
    for i in 0..20 {
        top.push(i as f64, i);
        assert!(top.len() <= 5);
    }
    let kept: Vec<i32> = top.into_sorted_vec().into_iter().map(|(_, i)| i).collect();
    assert_eq!(kept, vec![19, 18, 17, 16, 15]);
}

#[test]
fn test_top_k_requires_strictly_greater_score_once_full() {
    let mut top = BoundedTopK::new(2);
    top.push(1.0, "first");
    top.push(2.0, "second");
    top.push(1.0, "tie");
    assert_eq!(top.min_score(), Some(1.0));
    let kept = top.into_sorted_vec();
    assert_eq!(kept, vec![(2.0, "second"), (1.0, "first")]);
}

#[test]
fn test_top_k_sorted_descending() {
    let mut top = BoundedTopK::new(4);
    for score in [3.5, 0.5, 9.0, 4.25, 7.0, 1.0] {
        top.push(score, score);
    }
    let scores: Vec<f64> = top.into_sorted_vec().into_iter().map(|(s, _)| s).collect();
    assert_eq!(scores, vec![9.0, 7.0, 4.25, 3.5]);
}

#[test]
fn test_top_k_zero_capacity_keeps_nothing() {
    let mut top = BoundedTopK::new(0);
    assert!(!top.accepts(100.0));
    top.push(100.0, ());
    assert!(top.is_empty());
}

#[test]
fn test_top_k_merge_matches_single_pass() {
    let scores = [5.0, 1.0, 8.0, 3.0, 9.0, 2.0, 7.0];

    let mut single = BoundedTopK::new(3);
    for s in scores {
        single.push(s, s);
    }

    let mut left = BoundedTopK::new(3);
    let mut right = BoundedTopK::new(3);
    for (i, s) in scores.into_iter().enumerate() {
        if i % 2 == 0 {
            left.push(s, s);
        } else {
            right.push(s, s);
        }
    }
    left.merge(right);

    assert_eq!(left.into_sorted_vec(), single.into_sorted_vec());
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

#[test]
fn test_five_of_six_groups_gives_six_subsets() {
    let subsets = group_subsets(&six_groups(), 5).unwrap();
    assert_eq!(subsets.len(), 6);
    assert_eq!(subsets[0], vec![0, 1, 2, 3, 4]);
    assert_eq!(subsets[5], vec![1, 2, 3, 4, 5]);
    for subset in &subsets {
        assert_eq!(subset.len(), 5);
    }
}

#[test]
fn test_subsets_are_lexicographic() {
    let subsets = group_subsets(&six_groups(), 2).unwrap();
    assert_eq!(subsets.len(), 15);
    assert_eq!(subsets[0], vec![0, 1]);
    assert_eq!(subsets[1], vec![0, 2]);
    assert_eq!(subsets[5], vec![1, 2]);
    assert_eq!(subsets[14], vec![4, 5]);
}

#[test]
fn test_invalid_group_selection() {
    assert!(matches!(
        group_subsets(&six_groups(), 7),
        Err(PlanError::InvalidGroupSelection { chosen: 7, available: 6 })
    ));
    assert!(matches!(
        group_subsets(&six_groups(), 0),
        Err(PlanError::InvalidGroupSelection { .. })
    ));
}

#[test]
fn test_cross_product_first_group_varies_slowest() {
    let defs = groups(&[("a", &["a1", "a2"]), ("b", &["b1", "b2", "b3"])]);
    let combos = location_combinations(&defs, &[0, 1]);

    assert_eq!(combos.len(), 6);
    assert_eq!(combos[0].locations, vec!["a1", "b1"]);
    assert_eq!(combos[1].locations, vec!["a1", "b2"]);
    assert_eq!(combos[3].locations, vec!["a2", "b1"]);
    assert_eq!(combos[0].groups, vec!["a", "b"]);
}

#[test]
fn test_combination_count_is_sum_of_products() {
    let defs = six_groups();
    // sizes 2,3,4,4,3,1: product 288, dropping each group in turn
    let expected = 288 / 2 + 288 / 3 + 288 / 4 + 288 / 4 + 288 / 3 + 288;
    assert_eq!(count_combinations(&defs, 5).unwrap(), expected);

    let enumerated: usize = group_subsets(&defs, 5)
        .unwrap()
        .iter()
        .map(|subset| location_combinations(&defs, subset).len())
        .sum();
    assert_eq!(enumerated, expected);
}

#[test]
fn test_duplicate_location_rejected() {
    let result = GroupDefinition::new(vec![
        Group {
            name: "aqua".into(),
            locations: vec!["Pond".into()],
        },
        Group {
            name: "fit".into(),
            locations: vec!["Well".into(), "Pond".into()],
        },
    ]);
    match result {
        Err(PlanError::DuplicateLocation {
            location,
            first_group,
            second_group,
        }) => {
            assert_eq!(location, "Pond");
            assert_eq!(first_group, "aqua");
            assert_eq!(second_group, "fit");
        }
        other => panic!("expected duplicate location error, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Aggregation and scoring
// ---------------------------------------------------------------------------

#[test]
fn test_aggregate_counts_only_positive_yields() {
    let table = yield_table(&[
        ("wood", &[("a1", 2.5), ("c1", 1.5), ("z9", 100.0)]),
        ("ore", &[("a1", -4.0), ("c1", 3.0)]),
        ("sand", &[("a1", 0.0)]),
    ]);
    let aggregate = aggregate_yield(&table, &combination(&["a1", "c1"]));

    assert_eq!(aggregate.len(), 2);
    assert_eq!(aggregate["wood"], 4.0);
    assert_eq!(aggregate["ore"], 3.0);
    assert!(!aggregate.contains_key("sand"));
}

#[test]
fn test_missing_ingredient_fails_scoring() {
    let aggregate = BTreeMap::from([("wood".to_string(), 4.0)]);
    let combo = combination(&["a1", "c1"]);

    match supply_ratios(&aggregate, &demand(&[("wood", 2), ("ore", 1)]), &combo) {
        Err(PlanError::MissingIngredientYield {
            ingredient,
            combination,
        }) => {
            assert_eq!(ingredient, "ore");
            assert_eq!(combination, vec!["a1", "c1"]);
        }
        other => panic!("expected missing ingredient error, got {:?}", other),
    }
}

#[test]
fn test_zero_demand_places_no_constraint() {
    let aggregate = BTreeMap::from([("wood".to_string(), 4.0)]);
    let ratios = supply_ratios(&aggregate, &demand(&[("wood", 2), ("ore", 0)]), &combination(&["a1"]))
        .unwrap();
    assert_eq!(ratios.len(), 1);
    assert_eq!(ratios["wood"], 2.0);
}

#[test]
fn test_normalized_ratios_peak_at_one() {
    let ratios = BTreeMap::from([
        ("wood".to_string(), 2.0),
        ("ore".to_string(), 0.5),
        ("sand".to_string(), 1.0),
    ]);
    let normalized = normalize_ratios(&ratios);
    assert_eq!(normalized["wood"], 1.0);
    assert_eq!(normalized["ore"], 0.25);
    assert_eq!(normalized["sand"], 0.5);
}

#[test]
fn test_score_modes() {
    let aggregate = BTreeMap::from([("wood".to_string(), 6.0), ("ore".to_string(), 1.0)]);
    let needs = demand(&[("wood", 2), ("ore", 2)]);
    let combo = combination(&["a1"]);

    let by_ingredient =
        score_combination(&aggregate, &needs, &combo, "wood", RankingMode::ScoringIngredient).unwrap();
    assert_eq!(by_ingredient, 6.0);

    let by_bottleneck =
        score_combination(&aggregate, &needs, &combo, "wood", RankingMode::Bottleneck).unwrap();
    assert_eq!(by_bottleneck, 0.5);

    let absent =
        score_combination(&aggregate, &needs, &combo, "pearl", RankingMode::ScoringIngredient).unwrap();
    assert_eq!(absent, 0.0);
}

// ---------------------------------------------------------------------------
// Full search
// ---------------------------------------------------------------------------

fn small_world() -> (GroupDefinition, EffectiveYieldTable, SimplifiedEquations) {
    let defs = groups(&[("A", &["a1", "a2"]), ("B", &["b1"]), ("C", &["c1", "c2"])]);
    let table = yield_table(&[
        ("wood", &[("a1", 2.0), ("c1", 3.0)]),
        ("ore", &[("b1", 2.0), ("c2", 4.0)]),
    ]);
    let equations = SimplifiedEquations {
        level: 5,
        plus_level: demand(&[("wood", 2), ("ore", 1)]),
        plus_n: demand(&[("wood", 1), ("ore", 0)]),
    };
    (defs, table, equations)
}

#[test]
fn test_search_excludes_layouts_missing_ingredients() {
    let (defs, table, equations) = small_world();
    let config = SearchConfig {
        top_k: 3,
        chosen_groups: Some(2),
        scoring_ingredient: "wood".to_string(),
        ..SearchConfig::default()
    };

    let outcome = search(&defs, &table, &equations, &config).unwrap();

    assert_eq!(outcome.evaluated, 8);
    assert_eq!(outcome.excluded_level, 5);
    assert_eq!(outcome.excluded_marginal, 3);

    let level_scores: Vec<f64> = outcome.level_top.iter().map(|s| s.score).collect();
    assert_eq!(level_scores, vec![3.0, 2.0, 2.0]);
    assert_eq!(outcome.level_top[0].combination.locations, vec!["b1", "c1"]);
    assert_eq!(outcome.level_top[0].combination.groups, vec!["B", "C"]);

    let marginal_scores: Vec<f64> = outcome.marginal_top.iter().map(|s| s.score).collect();
    assert_eq!(marginal_scores, vec![5.0, 3.0, 3.0]);
    assert_eq!(outcome.marginal_top[0].combination.locations, vec!["a1", "c1"]);
}

#[test]
fn test_search_bottleneck_ranking() {
    let (defs, table, equations) = small_world();
    let config = SearchConfig {
        top_k: 1,
        chosen_groups: Some(2),
        ranking: RankingMode::Bottleneck,
        ..SearchConfig::default()
    };

    let outcome = search(&defs, &table, &equations, &config).unwrap();

    assert_eq!(outcome.level_top.len(), 1);
    assert_eq!(outcome.level_top[0].score, 1.5);
    assert_eq!(outcome.level_top[0].combination.locations, vec!["b1", "c1"]);
    assert_eq!(outcome.level_top[0].aggregate["wood"], 3.0);
}

#[test]
fn test_search_defaults_to_all_groups_but_one() {
    let (defs, table, equations) = small_world();
    let outcome = search(&defs, &table, &equations, &SearchConfig::default()).unwrap();
    assert_eq!(outcome.evaluated, count_combinations(&defs, 2).unwrap());
    assert!(outcome.level_top.len() <= 5);
}

#[test]
fn test_single_group_defaults_to_choosing_it() {
    let defs = groups(&[("A", &["a1", "a2"])]);
    let table = yield_table(&[("wood", &[("a1", 2.0)])]);
    let equations = SimplifiedEquations {
        level: 5,
        plus_level: demand(&[("wood", 2)]),
        plus_n: demand(&[("wood", 1)]),
    };
    let config = SearchConfig {
        scoring_ingredient: "wood".to_string(),
        ..SearchConfig::default()
    };

    let outcome = search(&defs, &table, &equations, &config).unwrap();

    assert_eq!(outcome.evaluated, 2);
    assert_eq!(outcome.excluded_level, 1);
    assert_eq!(outcome.level_top.len(), 1);
    assert_eq!(outcome.level_top[0].combination.locations, vec!["a1"]);
}
