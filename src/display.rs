//! Display and formatting utilities for craftmax.
//!
//! This module provides functions for formatting output and displaying
//! the resolved recipes, cost equations and ranked layouts.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::Snapshot;
use crate::models::{Breakdown, CostEquation, ScoredCombination, SearchOutcome, SimplifiedEquations, UpgradeRule};
use crate::search::{normalize_ratios, supply_ratios};

/// Formats an equation as `constant+coefficient n` terms.
///
/// # Example
///
/// ```
/// use craftmax::display::format_equation;
/// use craftmax::models::{CostEquation, Term};
///
/// let equation = CostEquation::from([
///     ("Log".to_string(), Term::new(1, 1)),
///     ("Ore".to_string(), Term::new(0, 2)),
/// ]);
/// assert_eq!(format_equation(&equation), "Log1+1n, Ore0+2n");
/// ```
pub fn format_equation(equation: &CostEquation) -> String {
    equation
        .iter()
        .map(|(primary, term)| format!("{}{}+{}n", primary, term.constant, term.coefficient))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats a demand vector largest quantity first; ties keep name order.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use craftmax::display::format_demand;
///
/// let demand = BTreeMap::from([("Log".to_string(), 6), ("Ore".to_string(), 10)]);
/// assert_eq!(format_demand(&demand), "Ore10 Log6");
/// ```
pub fn format_demand(demand: &BTreeMap<String, u64>) -> String {
    let mut entries: Vec<_> = demand.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .iter()
        .map(|(primary, qty)| format!("{}{}", primary, qty))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a fraction as a percentage with one decimal.
///
/// # Example
///
/// ```
/// use craftmax::display::format_percent;
///
/// assert_eq!(format_percent(1.0), "100.0%");
/// assert_eq!(format_percent(0.4567), "45.7%");
/// ```
pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

fn format_yields(aggregate: &BTreeMap<String, f64>) -> String {
    aggregate
        .iter()
        .map(|(ingredient, amount)| format!("{} {:.2}", ingredient, amount))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prints every crafted item's primary breakdown, then the set of all primaries.
pub fn display_breakdowns(breakdowns: &[(String, Breakdown)], primaries: &BTreeSet<String>) {
    println!();
    println!("[RECIPES]");
    println!("----------------------------------------------------------------");
    for (item, breakdown) in breakdowns {
        println!("  {} is made of:", item);
        for (primary, quantity) in breakdown {
            println!("    {} {}", quantity, primary);
        }
    }

    println!();
    println!("[PRIMARY INGREDIENTS]");
    println!("----------------------------------------------------------------");
    for primary in primaries {
        println!("  {}", primary);
    }
}

/// Prints a short summary of the loaded map, worker and upgrade tables.
pub fn display_tables(snapshot: &Snapshot) {
    println!();
    println!("[MAP YIELDS]");
    println!("----------------------------------------------------------------");
    for row in &snapshot.map.rows {
        let cells: Vec<String> = snapshot
            .map
            .locations
            .iter()
            .zip(&row.values)
            .filter(|(_, value)| **value > 0)
            .map(|(location, value)| format!("{} {}", location, value))
            .collect();
        println!("  {:<16} {}", row.name, cells.join(", "));
    }

    println!();
    println!("[WORKERS]");
    println!("----------------------------------------------------------------");
    for row in &snapshot.workers.rows {
        let cells: Vec<String> = snapshot
            .workers
            .locations
            .iter()
            .zip(&row.values)
            .map(|(location, value)| format!("{} {}", location, value))
            .collect();
        println!("  {:<16} {}", row.name, cells.join(", "));
    }

    println!();
    println!("[UPGRADES]");
    println!("----------------------------------------------------------------");
    for rule in &snapshot.upgrades {
        println!("  {} <- {} x {}", rule.item, rule.quantity, rule.sub_item);
    }
}

/// Prints each rule's equation, the total equation and its simplified forms.
pub fn display_equations(
    rule_equations: &[(UpgradeRule, CostEquation)],
    total: &CostEquation,
    simplified: &SimplifiedEquations,
) {
    println!();
    println!("[UPGRADE EQUATIONS]");
    println!("----------------------------------------------------------------");
    for (rule, equation) in rule_equations {
        println!("  {}: {}", rule.item, format_equation(equation));
    }

    println!();
    println!("  Total: {}", format_equation(total));
    println!();
    println!("  +{} equation: {}", simplified.level, format_demand(&simplified.plus_level));
    println!("  +n equation: {}", format_demand(&simplified.plus_n));
}

/// Prints one ranked list of combinations with yields and supply shares.
pub fn display_ranking(title: &str, ranked: &[ScoredCombination], demand: &BTreeMap<String, u64>) {
    println!();
    println!("[{}]", title);
    println!("----------------------------------------------------------------");

    if ranked.is_empty() {
        println!("  No combination can supply every required ingredient.");
        return;
    }

    for (rank, entry) in ranked.iter().enumerate() {
        println!(
            "  {}. {}  (score {:.1})",
            rank + 1,
            entry.combination.locations.join(", "),
            entry.score * 100.0
        );
        println!("     yields: {}", format_yields(&entry.aggregate));

        match supply_ratios(&entry.aggregate, demand, &entry.combination) {
            Ok(ratios) => {
                let shares: Vec<String> = normalize_ratios(&ratios)
                    .iter()
                    .map(|(ingredient, &share)| format!("{} {}", ingredient, format_percent(share)))
                    .collect();
                println!("     supply: {}", shares.join(", "));
            }
            Err(err) => println!("     supply: unavailable ({})", err),
        }
    }
}

/// Displays the complete search results to stdout.
pub fn display_results(outcome: &SearchOutcome, simplified: &SimplifiedEquations) {
    println!();
    println!("+================================================================+");
    println!("|               CRAFTMAX LOCATION LAYOUT RESULTS                 |");
    println!("+================================================================+");
    println!();
    println!("  Combinations evaluated: {}", outcome.evaluated);
    if outcome.excluded_level > 0 || outcome.excluded_marginal > 0 {
        println!(
            "  Excluded for missing ingredients: {} (+{}), {} (+n)",
            outcome.excluded_level, simplified.level, outcome.excluded_marginal
        );
    }

    display_ranking(
        &format!("EQUATION +{}", simplified.level),
        &outcome.level_top,
        &simplified.plus_level,
    );
    display_ranking("EQUATION +n", &outcome.marginal_top, &simplified.plus_n);
    println!();
}
