//! Recipe decomposition.
//!
//! Resolves crafted items down to the primary ingredients they are made of.
//! Amounts reaching the same primary through different ingredient paths are
//! summed.

use std::collections::{BTreeSet, HashSet};

use crate::error::{PlanError, Result};
use crate::models::{Breakdown, RecipeBook, UpgradeRule};

/// Resolves `quantity` units of `item` into primary ingredients.
///
/// An item without a recipe is primary and resolves to itself.
///
/// # Errors
///
/// Returns [`PlanError::CyclicRecipe`] if `item` is, directly or
/// transitively, an ingredient of itself.
///
/// # Example
///
/// ```
/// use craftmax::models::{Recipe, RecipeBook};
/// use craftmax::recipe::resolve_primary;
///
/// let book = RecipeBook::from_recipes(vec![
///     Recipe::new("Plank", ("Log", 2), ("Resin", 1)),
///     Recipe::new("Table", ("Plank", 4), ("Nail", 8)),
/// ]);
///
/// let table = resolve_primary(&book, "Table", 1).unwrap();
/// assert_eq!(table["Log"], 8);
/// assert_eq!(table["Resin"], 4);
/// assert_eq!(table["Nail"], 8);
/// ```
pub fn resolve_primary(book: &RecipeBook, item: &str, quantity: u64) -> Result<Breakdown> {
    let mut path = Vec::new();
    resolve_recursive(book, item, quantity, &mut path)
}

fn resolve_recursive(
    book: &RecipeBook,
    item: &str,
    quantity: u64,
    path: &mut Vec<String>, // items currently being expanded
) -> Result<Breakdown> {
    let Some(recipe) = book.get(item) else {
        return Ok(Breakdown::from([(item.to_string(), quantity)]));
    };

    if path.iter().any(|p| p == item) {
        let mut cycle = path.clone();
        cycle.push(item.to_string());
        return Err(PlanError::CyclicRecipe {
            item: item.to_string(),
            path: cycle,
        });
    }

    path.push(item.to_string());

    let mut result = Breakdown::new();
    for ingredient in &recipe.ingredients {
        let partial = resolve_recursive(book, &ingredient.name, ingredient.quantity, path)?;
        for (primary, amount) in partial {
            let scaled = amount
                .checked_mul(quantity)
                .ok_or_else(|| overflow(&primary))?;
            let slot = result.entry(primary).or_default();
            *slot = slot.checked_add(scaled).ok_or_else(|| overflow(item))?;
        }
    }

    path.pop();
    Ok(result)
}

fn overflow(item: &str) -> PlanError {
    PlanError::QuantityOverflow {
        item: item.to_string(),
    }
}

/// Every primary ingredient used by at least one crafted item.
pub fn primary_ingredients(book: &RecipeBook) -> Result<BTreeSet<String>> {
    let mut primaries = BTreeSet::new();
    for recipe in book.iter() {
        primaries.extend(resolve_primary(book, &recipe.item, 1)?.into_keys());
    }
    Ok(primaries)
}

/// Checks that recipes and upgrade rules only reference items that are
/// either crafted or gatherable.
///
/// # Arguments
///
/// * `book` - All recipes
/// * `rules` - All upgrade rules
/// * `known_primaries` - Ingredients listed in the map table
///
/// # Errors
///
/// Returns [`PlanError::UnknownItem`] for the first unresolvable reference.
pub fn validate_items(
    book: &RecipeBook,
    rules: &[UpgradeRule],
    known_primaries: &HashSet<&str>,
) -> Result<()> {
    let known = |item: &str| book.is_crafted(item) || known_primaries.contains(item);

    for recipe in book.iter() {
        for ingredient in &recipe.ingredients {
            if !known(&ingredient.name) {
                return Err(PlanError::UnknownItem {
                    item: ingredient.name.clone(),
                    referenced_by: recipe.item.clone(),
                });
            }
        }
    }

    for rule in rules {
        for item in [&rule.item, &rule.sub_item] {
            if !known(item) {
                return Err(PlanError::UnknownItem {
                    item: item.clone(),
                    referenced_by: format!("upgrade {}", rule.item),
                });
            }
        }
    }

    Ok(())
}
