//! End-to-end tests over the sample tables in `data/`.

use std::path::Path;

use craftmax::data::{load_all_data, parse_snapshot};
use craftmax::error::PlanError;
use craftmax::models::{RankingMode, SearchConfig, Term};
use craftmax::planner::analyze;
use craftmax::search::count_combinations;
use craftmax::wasm::{analyze as analyze_json, analyze_embedded, get_version};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_sample_breakdowns_and_equations() {
    let data_dir = Path::new("data");
    if !data_dir.exists() {
        return;
    }

    let snapshot = load_all_data(data_dir).expect("Failed to load data");
    let analysis = analyze(&snapshot, &SearchConfig::default()).expect("Analysis failed");

    let rod = analysis
        .breakdowns
        .iter()
        .find(|(item, _)| item == "rod")
        .map(|(_, b)| b.clone())
        .expect("rod should be resolved");
    assert_eq!(rod["branch"], 6);
    assert_eq!(rod["stone"], 2);
    assert_eq!(rod["ore"], 2);
    assert_eq!(rod["herb"], 2);
    assert_eq!(rod["cloth"], 1);

    assert_eq!(analysis.primaries.len(), 6);
    assert_eq!(analysis.rule_equations.len(), 3);

    assert_eq!(analysis.total["branch"], Term::new(6, 9));
    assert_eq!(analysis.total["shell"], Term::new(6, 4));
    assert_eq!(analysis.simplified.plus_level["branch"], 51);
    assert_eq!(analysis.simplified.plus_n["ore"], 3);
}

#[test]
fn test_sample_search_default_ranking() {
    let data_dir = Path::new("data");
    if !data_dir.exists() {
        return;
    }

    let snapshot = load_all_data(data_dir).expect("Failed to load data");
    let analysis = analyze(&snapshot, &SearchConfig::default()).expect("Analysis failed");
    let outcome = &analysis.outcome;

    assert_eq!(outcome.evaluated, count_combinations(&snapshot.groups, 5).unwrap());
    assert_eq!(outcome.evaluated, 1888);
    assert_eq!(outcome.excluded_level, 1315);
    assert_eq!(outcome.excluded_marginal, 1315);

    assert_eq!(outcome.level_top.len(), 5);
    assert_eq!(outcome.marginal_top.len(), 5);
    assert!(approx(outcome.level_top[0].score, 14.6));
    for pair in outcome.level_top.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for entry in &outcome.level_top {
        assert_eq!(entry.combination.locations.len(), 5);
        assert!(approx(entry.score, entry.aggregate["branch"]));
    }
}

#[test]
fn test_sample_search_bottleneck_ranking() {
    let data_dir = Path::new("data");
    if !data_dir.exists() {
        return;
    }

    let snapshot = load_all_data(data_dir).expect("Failed to load data");
    let config = SearchConfig {
        ranking: RankingMode::Bottleneck,
        ..SearchConfig::default()
    };
    let analysis = analyze(&snapshot, &config).expect("Analysis failed");

    let best = &analysis.outcome.level_top[0];
    assert!(approx(best.score, 0.12));
    assert_eq!(
        best.combination.locations,
        vec!["Pawnshop", "Sandbar", "Hospital", "Forest", "Laboratory"]
    );
    assert!(approx(analysis.outcome.marginal_top[0].score, 0.75));
}

#[test]
fn test_unknown_ingredient_fails_analysis() {
    let snapshot = parse_snapshot(
        "item,ingredient1,quantity1,ingredient2,quantity2\nplank,branch,3,moonstone,1\n",
        ",Pond\nbranch,3\n",
        ",Pond\nAda,50\n",
        "item,sub_item,quantity\n",
        "group,location\naqua,Pond\n",
    )
    .unwrap();

    match analyze(&snapshot, &SearchConfig::default()) {
        Err(PlanError::UnknownItem { item, referenced_by }) => {
            assert_eq!(item, "moonstone");
            assert_eq!(referenced_by, "plank");
        }
        other => panic!("expected unknown item error, got {:?}", other.map(|a| a.total)),
    }
}

#[test]
fn test_wasm_analyze_roundtrip() {
    let input = serde_json::json!({
        "recipes": "item,ingredient1,quantity1,ingredient2,quantity2\nplank,branch,2,stone,1\n",
        "map": ",Pond,Well,Cave\nbranch,4,,2\nstone,,3,1\n",
        "workers": ",Pond,Well,Cave\nAda,50,50,100\n",
        "upgrades": "item,sub_item,quantity\nplank,stone,1\n",
        "groups": "group,location\naqua,Pond\nfit,Well\ndeep,Cave\n",
        "top": 2,
        "ranking": "bottleneck"
    });

    let output: serde_json::Value =
        serde_json::from_str(&analyze_json(&input.to_string())).unwrap();

    assert_eq!(output["success"], true);
    assert_eq!(output["level"], 5);
    // plank <- stone x1: branch(0,2) stone(1,1)
    assert_eq!(output["total_equation"]["branch"], serde_json::json!([0, 2]));
    assert_eq!(output["plus_level"]["stone"], 6);
    assert_eq!(output["evaluated"], 3);
    let top = output["level_top"].as_array().unwrap();
    assert!(top.len() <= 2);
    assert!(!top.is_empty());
}

#[test]
fn test_wasm_analyze_reports_invalid_input() {
    let output: serde_json::Value = serde_json::from_str(&analyze_json("{not json")).unwrap();
    assert_eq!(output["success"], false);
    assert!(output["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[test]
fn test_wasm_embedded_data() {
    let output: serde_json::Value = serde_json::from_str(&analyze_embedded("{}")).unwrap();
    assert_eq!(output["success"], true);
    assert_eq!(output["evaluated"], 1888);
    assert_eq!(output["level_top"].as_array().unwrap().len(), 5);
}

#[test]
fn test_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}
