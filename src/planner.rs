//! End-to-end pipeline: tables in, ranked layouts out.

use std::collections::{BTreeSet, HashSet};

use crate::data::Snapshot;
use crate::equation::{aggregate_all_rules, build_rule_equation, simplify};
use crate::error::Result;
use crate::models::{Breakdown, CostEquation, SearchConfig, SearchOutcome, SimplifiedEquations, UpgradeRule};
use crate::recipe::{primary_ingredients, resolve_primary, validate_items};
use crate::search::search;
use crate::yields::{effective_yields, location_multipliers};

/// Everything computed from one snapshot.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Primary breakdown of one unit of each crafted item, in table order
    pub breakdowns: Vec<(String, Breakdown)>,
    pub primaries: BTreeSet<String>,
    /// Each upgrade rule with its own equation
    pub rule_equations: Vec<(UpgradeRule, CostEquation)>,
    /// Sum of all rule equations
    pub total: CostEquation,
    pub simplified: SimplifiedEquations,
    pub outcome: SearchOutcome,
}

/// Runs validation, recipe resolution, equation building and the search.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use craftmax::data::load_all_data;
/// use craftmax::models::SearchConfig;
/// use craftmax::planner::analyze;
///
/// let snapshot = load_all_data(Path::new("data")).unwrap();
/// let analysis = analyze(&snapshot, &SearchConfig::default()).unwrap();
/// println!("{} layouts ranked", analysis.outcome.level_top.len());
/// ```
pub fn analyze(snapshot: &Snapshot, config: &SearchConfig) -> Result<Analysis> {
    let known_primaries: HashSet<&str> = snapshot.map.row_names().collect();
    validate_items(&snapshot.recipes, &snapshot.upgrades, &known_primaries)?;

    let breakdowns = snapshot
        .recipes
        .iter()
        .map(|recipe| -> Result<(String, Breakdown)> {
            Ok((recipe.item.clone(), resolve_primary(&snapshot.recipes, &recipe.item, 1)?))
        })
        .collect::<Result<Vec<_>>>()?;
    let primaries = primary_ingredients(&snapshot.recipes)?;

    let rule_equations = snapshot
        .upgrades
        .iter()
        .map(|rule| -> Result<(UpgradeRule, CostEquation)> {
            Ok((rule.clone(), build_rule_equation(&snapshot.recipes, rule)?))
        })
        .collect::<Result<Vec<_>>>()?;
    let total = aggregate_all_rules(&snapshot.recipes, &snapshot.upgrades)?;
    let simplified = simplify(&total, config.level)?;

    if !total.contains_key(&config.scoring_ingredient) {
        tracing::warn!(
            ingredient = %config.scoring_ingredient,
            "scoring ingredient does not appear in the upgrade equation"
        );
    }

    let multipliers = location_multipliers(&snapshot.workers);
    let table = effective_yields(&snapshot.map, &multipliers);
    let outcome = search(&snapshot.groups, &table, &simplified, config)?;

    Ok(Analysis {
        breakdowns,
        primaries,
        rule_equations,
        total,
        simplified,
        outcome,
    })
}
