//! WebAssembly bindings for Craftmax.
//!
//! This module provides JavaScript-accessible functions for the layout planner.
//! Inputs and outputs cross the boundary as JSON strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::parse_snapshot;
use crate::error::Result;
use crate::models::{RankingMode, ScoredCombination, SearchConfig};
use crate::planner::{analyze as run_analysis, Analysis};
use crate::search::{normalize_ratios, supply_ratios};

/// JavaScript-friendly search options. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct JsOptions {
    #[serde(default = "default_level")]
    pub level: u64,
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default)]
    pub chosen_groups: Option<usize>,
    #[serde(default = "default_scoring_ingredient")]
    pub scoring_ingredient: String,
    #[serde(default)]
    pub ranking: RankingMode,
}

fn default_level() -> u64 {
    SearchConfig::default().level
}

fn default_top() -> usize {
    SearchConfig::default().top_k
}

fn default_scoring_ingredient() -> String {
    SearchConfig::default().scoring_ingredient
}

impl From<JsOptions> for SearchConfig {
    fn from(options: JsOptions) -> Self {
        SearchConfig {
            level: options.level,
            top_k: options.top,
            chosen_groups: options.chosen_groups,
            scoring_ingredient: options.scoring_ingredient,
            ranking: options.ranking,
        }
    }
}

/// JavaScript-friendly input: the five CSV tables as text plus options.
#[derive(Debug, Clone, Deserialize)]
pub struct JsAnalyzeInput {
    pub recipes: String,
    pub map: String,
    pub workers: String,
    pub upgrades: String,
    pub groups: String,
    #[serde(flatten)]
    pub options: JsOptions,
}

/// JavaScript-friendly breakdown of one crafted item.
#[derive(Debug, Clone, Serialize)]
pub struct JsBreakdown {
    pub item: String,
    pub primaries: BTreeMap<String, u64>,
}

/// JavaScript-friendly ranked layout.
#[derive(Debug, Clone, Serialize)]
pub struct JsLayout {
    pub score: f64,
    pub groups: Vec<String>,
    pub locations: Vec<String>,
    pub yields: BTreeMap<String, f64>,
    /// Supply ratio per ingredient relative to the best-supplied one
    pub supply: BTreeMap<String, f64>,
}

/// JavaScript-friendly analysis result.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsAnalyzeResult {
    pub success: bool,
    pub error: Option<String>,
    pub breakdowns: Vec<JsBreakdown>,
    pub primaries: Vec<String>,
    /// Total upgrade equation as `[constant, coefficient]` per primary
    pub total_equation: BTreeMap<String, [u64; 2]>,
    pub level: u64,
    pub plus_level: BTreeMap<String, u64>,
    pub plus_n: BTreeMap<String, u64>,
    pub level_top: Vec<JsLayout>,
    pub marginal_top: Vec<JsLayout>,
    pub evaluated: usize,
    pub excluded_level: usize,
    pub excluded_marginal: usize,
}

impl JsAnalyzeResult {
    fn failure(message: String) -> Self {
        log_error(&message);
        JsAnalyzeResult {
            success: false,
            error: Some(message),
            ..JsAnalyzeResult::default()
        }
    }

    fn from_analysis(analysis: &Analysis) -> Self {
        let layouts = |ranked: &[ScoredCombination], demand: &BTreeMap<String, u64>| -> Vec<JsLayout> {
            ranked
                .iter()
                .map(|entry| JsLayout {
                    score: entry.score,
                    groups: entry.combination.groups.clone(),
                    locations: entry.combination.locations.clone(),
                    yields: entry.aggregate.clone(),
                    supply: supply_ratios(&entry.aggregate, demand, &entry.combination)
                        .map(|ratios| normalize_ratios(&ratios))
                        .unwrap_or_default(),
                })
                .collect()
        };

        let simplified = &analysis.simplified;
        JsAnalyzeResult {
            success: true,
            error: None,
            breakdowns: analysis
                .breakdowns
                .iter()
                .map(|(item, primaries)| JsBreakdown {
                    item: item.clone(),
                    primaries: primaries.clone(),
                })
                .collect(),
            primaries: analysis.primaries.iter().cloned().collect(),
            total_equation: analysis
                .total
                .iter()
                .map(|(primary, term)| (primary.clone(), [term.constant, term.coefficient]))
                .collect(),
            level: simplified.level,
            plus_level: simplified.plus_level.clone(),
            plus_n: simplified.plus_n.clone(),
            level_top: layouts(&analysis.outcome.level_top, &simplified.plus_level),
            marginal_top: layouts(&analysis.outcome.marginal_top, &simplified.plus_n),
            evaluated: analysis.outcome.evaluated,
            excluded_level: analysis.outcome.excluded_level,
            excluded_marginal: analysis.outcome.excluded_marginal,
        }
    }
}

fn log_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    tracing::error!("{}", message);
}

fn run(input: JsAnalyzeInput) -> Result<Analysis> {
    let snapshot = parse_snapshot(
        &input.recipes,
        &input.map,
        &input.workers,
        &input.upgrades,
        &input.groups,
    )?;
    run_analysis(&snapshot, &input.options.into())
}

fn to_json(result: &JsAnalyzeResult) -> String {
    serde_json::to_string(result).unwrap_or_default()
}

/// Run the planner on tables supplied by the caller.
///
/// Takes a JSON string input and returns a JSON string result.
#[wasm_bindgen]
pub fn analyze(input_json: &str) -> String {
    let input: JsAnalyzeInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => return to_json(&JsAnalyzeResult::failure(format!("Invalid input: {}", e))),
    };

    match run(input) {
        Ok(analysis) => to_json(&JsAnalyzeResult::from_analysis(&analysis)),
        Err(e) => to_json(&JsAnalyzeResult::failure(e.to_string())),
    }
}

/// Run the planner on the tables embedded in the binary.
///
/// Takes a JSON string of options (`"{}"` for defaults).
#[wasm_bindgen]
pub fn analyze_embedded(options_json: &str) -> String {
    let options: JsOptions = match serde_json::from_str(options_json) {
        Ok(o) => o,
        Err(e) => return to_json(&JsAnalyzeResult::failure(format!("Invalid options: {}", e))),
    };

    let input = JsAnalyzeInput {
        recipes: include_str!("../data/recipes.csv").to_string(),
        map: include_str!("../data/map.csv").to_string(),
        workers: include_str!("../data/worker.csv").to_string(),
        upgrades: include_str!("../data/upgrade.csv").to_string(),
        groups: include_str!("../data/groups.csv").to_string(),
        options,
    };

    match run(input) {
        Ok(analysis) => to_json(&JsAnalyzeResult::from_analysis(&analysis)),
        Err(e) => to_json(&JsAnalyzeResult::failure(e.to_string())),
    }
}

/// Get the version of the planner.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
