//! Upgrade cost equations.
//!
//! An upgrade rule costs a fixed amount of its sub-item plus one unit of the
//! upgraded item per level. Resolving both parts to primaries gives a linear
//! equation `constant + coefficient * n` per primary ingredient.

use crate::error::{PlanError, Result};
use crate::models::{CostEquation, RecipeBook, SimplifiedEquations, UpgradeRule};
use crate::recipe::resolve_primary;

/// Builds the cost equation of a single upgrade rule.
///
/// The constant part is the breakdown of `rule.quantity` sub-items; the
/// coefficient is the breakdown of one upgraded item. A primary that only
/// appears on one side gets 0 on the other.
///
/// # Example
///
/// ```
/// use craftmax::equation::build_rule_equation;
/// use craftmax::models::{Recipe, RecipeBook, Term, UpgradeRule};
///
/// let book = RecipeBook::from_recipes(vec![
///     Recipe::new("Sword", ("Log", 1), ("Log", 0)),
///     Recipe::new("Sword+1", ("Log", 1), ("Ore", 2)),
/// ]);
/// let rule = UpgradeRule::new("Sword+1", "Sword", 1);
///
/// let equation = build_rule_equation(&book, &rule).unwrap();
/// assert_eq!(equation["Log"], Term::new(1, 1));
/// assert_eq!(equation["Ore"], Term::new(0, 2));
/// ```
pub fn build_rule_equation(book: &RecipeBook, rule: &UpgradeRule) -> Result<CostEquation> {
    let constant = resolve_primary(book, &rule.sub_item, rule.quantity)?;
    let incrementing = resolve_primary(book, &rule.item, 1)?;

    let mut equation = CostEquation::new();
    for (primary, amount) in constant {
        equation.entry(primary).or_default().constant = amount;
    }
    for (primary, amount) in incrementing {
        equation.entry(primary).or_default().coefficient = amount;
    }
    Ok(equation)
}

/// Sums the equations of every rule, per primary ingredient.
pub fn aggregate_all_rules(book: &RecipeBook, rules: &[UpgradeRule]) -> Result<CostEquation> {
    let mut total = CostEquation::new();
    for rule in rules {
        for (primary, term) in build_rule_equation(book, rule)? {
            let entry = total.entry(primary.clone()).or_default();
            match (
                entry.constant.checked_add(term.constant),
                entry.coefficient.checked_add(term.coefficient),
            ) {
                (Some(constant), Some(coefficient)) => {
                    entry.constant = constant;
                    entry.coefficient = coefficient;
                }
                _ => return Err(PlanError::QuantityOverflow { item: primary }),
            }
        }
    }
    Ok(total)
}

/// Collapses an equation into the cost of reaching `level` and the cost of
/// one additional level.
pub fn simplify(equation: &CostEquation, level: u64) -> Result<SimplifiedEquations> {
    let plus_level = equation
        .iter()
        .map(|(primary, term)| {
            term.at_level(level)
                .map(|cost| (primary.clone(), cost))
                .ok_or_else(|| PlanError::QuantityOverflow {
                    item: primary.clone(),
                })
        })
        .collect::<Result<_>>()?;

    Ok(SimplifiedEquations {
        level,
        plus_level,
        plus_n: equation
            .iter()
            .map(|(primary, term)| (primary.clone(), term.coefficient))
            .collect(),
    })
}
