//! Data models and structures for craftmax.
//!
//! This module contains the typed snapshot the planner works on: recipes,
//! upgrade rules, location tables and groups, plus the derived cost
//! equations and scored location combinations.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// Primary ingredient -> required quantity.
pub type Breakdown = BTreeMap<String, u64>;

/// Primary ingredient -> summed effective yield of one combination.
pub type AggregateYield = BTreeMap<String, f64>;

/// Primary ingredient -> (constant, per-level coefficient).
pub type CostEquation = BTreeMap<String, Term>;

/// One ingredient slot of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Name of the ingredient item
    pub name: String,
    /// Units consumed per craft
    pub quantity: u64,
}

/// A crafting recipe. Every crafted item is made from exactly two ingredients.
///
/// # Example
///
/// ```
/// use craftmax::models::Recipe;
///
/// let table = Recipe::new("Table", ("Plank", 4), ("Nail", 8));
/// assert_eq!(table.ingredients[0].name, "Plank");
/// assert_eq!(table.ingredients[1].quantity, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// The crafted item
    pub item: String,
    /// The two ingredients, in table order
    pub ingredients: [Ingredient; 2],
}

impl Recipe {
    pub fn new(item: &str, first: (&str, u64), second: (&str, u64)) -> Self {
        Recipe {
            item: item.to_string(),
            ingredients: [
                Ingredient {
                    name: first.0.to_string(),
                    quantity: first.1,
                },
                Ingredient {
                    name: second.0.to_string(),
                    quantity: second.1,
                },
            ],
        }
    }
}

/// All known recipes, keyed by crafted item and kept in table order.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    index: HashMap<String, usize>,
}

impl RecipeBook {
    /// Builds a book from recipes. A later recipe for the same item replaces
    /// the earlier one in place.
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let mut book = RecipeBook::default();
        for recipe in recipes {
            match book.index.get(&recipe.item) {
                Some(&slot) => book.recipes[slot] = recipe,
                None => {
                    book.index.insert(recipe.item.clone(), book.recipes.len());
                    book.recipes.push(recipe);
                }
            }
        }
        book
    }

    /// Returns the recipe for `item`, or `None` if the item is primary.
    pub fn get(&self, item: &str) -> Option<&Recipe> {
        self.index.get(item).map(|&slot| &self.recipes[slot])
    }

    pub fn is_crafted(&self, item: &str) -> bool {
        self.index.contains_key(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Upgrading `item` consumes `quantity` units of `sub_item` plus one more
/// `item` per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRule {
    /// The item being upgraded
    pub item: String,
    /// The fixed sub-item requirement
    pub sub_item: String,
    /// Units of `sub_item` required
    pub quantity: u64,
}

impl UpgradeRule {
    pub fn new(item: &str, sub_item: &str, quantity: u64) -> Self {
        UpgradeRule {
            item: item.to_string(),
            sub_item: sub_item.to_string(),
            quantity,
        }
    }
}

/// One primary ingredient's share of a cost equation: `constant + coefficient * n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Term {
    /// Fixed amount, independent of the upgrade level
    pub constant: u64,
    /// Amount added per upgrade level
    pub coefficient: u64,
}

impl Term {
    pub fn new(constant: u64, coefficient: u64) -> Self {
        Term {
            constant,
            coefficient,
        }
    }

    /// Evaluates the term at a concrete level, or `None` on overflow.
    pub fn at_level(&self, level: u64) -> Option<u64> {
        self.coefficient
            .checked_mul(level)
            .and_then(|scaled| scaled.checked_add(self.constant))
    }
}

/// A cost equation collapsed into concrete per-ingredient demands.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedEquations {
    /// The level the first equation was evaluated at
    pub level: u64,
    /// Total cost of reaching `level`
    pub plus_level: BTreeMap<String, u64>,
    /// Marginal cost of one more level
    pub plus_n: BTreeMap<String, u64>,
}

/// A table with one column per location, shared by the map and worker inputs.
///
/// For the map table each row is an ingredient and each value a raw yield;
/// for the worker table each row is a worker and each value a skill multiplier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTable {
    /// Column headers, in file order
    pub locations: Vec<String>,
    /// Data rows
    pub rows: Vec<LocationRow>,
}

/// A single named row of a [`LocationTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRow {
    /// Ingredient or worker name
    pub name: String,
    /// One value per location column (missing cells are 0)
    pub values: Vec<u32>,
}

impl LocationTable {
    /// Value at (`row`, `location`), 0 when either is unknown.
    pub fn value(&self, row: &str, location: &str) -> u32 {
        let Some(column) = self.locations.iter().position(|l| l == location) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|r| r.name == row)
            .and_then(|r| r.values.get(column).copied())
            .unwrap_or(0)
    }

    /// Iterates the values of one location column, in row order.
    pub fn column<'a>(&'a self, location: &str) -> impl Iterator<Item = u32> + 'a {
        let column = self.locations.iter().position(|l| l == location);
        self.rows.iter().map(move |row| {
            column
                .and_then(|c| row.values.get(c).copied())
                .unwrap_or(0)
        })
    }

    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.name.as_str())
    }
}

/// A named set of locations. Only one location per group is farmed at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub locations: Vec<String>,
}

/// The partition of all locations into groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDefinition {
    groups: Vec<Group>,
}

impl GroupDefinition {
    /// Validates that no location belongs to two groups.
    ///
    /// # Example
    ///
    /// ```
    /// use craftmax::models::{Group, GroupDefinition};
    ///
    /// let groups = GroupDefinition::new(vec![
    ///     Group { name: "forest".into(), locations: vec!["Grove".into()] },
    ///     Group { name: "coast".into(), locations: vec!["Grove".into()] },
    /// ]);
    /// assert!(groups.is_err());
    /// ```
    pub fn new(groups: Vec<Group>) -> Result<Self> {
        let mut owner: HashMap<&str, &str> = HashMap::new();
        for group in &groups {
            for location in &group.locations {
                if let Some(first) = owner.insert(location.as_str(), group.name.as_str()) {
                    return Err(PlanError::DuplicateLocation {
                        location: location.clone(),
                        first_group: first.to_string(),
                        second_group: group.name.clone(),
                    });
                }
            }
        }
        Ok(GroupDefinition { groups })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Effective (worker-scaled) yield for every (ingredient, location) pair.
#[derive(Debug, Clone, Default)]
pub struct EffectiveYieldTable {
    /// Rows in map table order
    pub rows: Vec<EffectiveYieldRow>,
}

#[derive(Debug, Clone)]
pub struct EffectiveYieldRow {
    pub ingredient: String,
    pub by_location: HashMap<String, f64>,
}

impl EffectiveYieldTable {
    pub fn get(&self, ingredient: &str, location: &str) -> f64 {
        self.rows
            .iter()
            .find(|r| r.ingredient == ingredient)
            .and_then(|r| r.by_location.get(location).copied())
            .unwrap_or(0.0)
    }
}

/// One location picked from each of the selected groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combination {
    /// Names of the selected groups
    pub groups: Vec<String>,
    /// The chosen location of each selected group, aligned with `groups`
    pub locations: Vec<String>,
}

/// A combination with its ranking score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCombination {
    /// Ranking key (see [`RankingMode`])
    pub score: f64,
    pub combination: Combination,
    /// Summed positive effective yields over the combination's locations
    pub aggregate: AggregateYield,
}

/// How combinations are ranked once their ratios are known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMode {
    /// Rank by the raw aggregate yield of the scoring ingredient
    #[default]
    ScoringIngredient,
    /// Rank by the lowest supply/demand ratio over all demanded ingredients
    Bottleneck,
}

/// Tunables for the equation collapse and the combination search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Upgrade level the first equation is evaluated at
    pub level: u64,
    /// Size of each ranked result set
    pub top_k: usize,
    /// Number of groups per combination; `None` means all but one
    pub chosen_groups: Option<usize>,
    /// Ingredient whose yield is the ranking key in [`RankingMode::ScoringIngredient`]
    pub scoring_ingredient: String,
    pub ranking: RankingMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            level: 5,
            top_k: 5,
            chosen_groups: None,
            scoring_ingredient: "branch".to_string(),
            ranking: RankingMode::ScoringIngredient,
        }
    }
}

/// Result of running the search against both simplified equations.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Best combinations against the level equation, best first
    pub level_top: Vec<ScoredCombination>,
    /// Best combinations against the marginal equation, best first
    pub marginal_top: Vec<ScoredCombination>,
    /// Number of combinations enumerated
    pub evaluated: usize,
    /// Combinations dropped from the level ranking for a missing ingredient
    pub excluded_level: usize,
    /// Combinations dropped from the marginal ranking for a missing ingredient
    pub excluded_marginal: usize,
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// CSV row structure for `recipes.csv`.
#[derive(Debug, Deserialize)]
pub struct RecipeRow {
    pub item: String,
    pub ingredient1: String,
    pub quantity1: u64,
    pub ingredient2: String,
    pub quantity2: u64,
}

/// CSV row structure for `upgrade.csv`.
#[derive(Debug, Deserialize)]
pub struct UpgradeRow {
    pub item: String,
    pub sub_item: String,
    pub quantity: u64,
}

/// CSV row structure for `groups.csv`.
#[derive(Debug, Deserialize)]
pub struct GroupRow {
    pub group: String,
    pub location: String,
}
