//! Location combination search.
//!
//! Every layout farms one location from each of `k` groups (5 of the 6
//! reference groups). All layouts are enumerated, their effective yields
//! summed, and the best are kept per equation in a [`BoundedTopK`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::error::{PlanError, Result};
use crate::models::{
    AggregateYield, Combination, EffectiveYieldTable, GroupDefinition, RankingMode,
    ScoredCombination, SearchConfig, SearchOutcome, SimplifiedEquations,
};

struct Ranked<T> {
    score: f64,
    item: T,
}

// Reversed so the heap top is the lowest score.
impl<T> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
    }
}

impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Ranked<T> {}

/// Keeps the `capacity` highest-scoring items seen so far.
///
/// Once full, a new item only displaces the current minimum if its score is
/// strictly greater.
///
/// # Example
///
/// ```
/// use craftmax::search::BoundedTopK;
///
/// let mut top = BoundedTopK::new(2);
/// top.push(1.0, "a");
/// top.push(3.0, "b");
/// top.push(2.0, "c");
/// assert_eq!(top.into_sorted_vec(), vec![(3.0, "b"), (2.0, "c")]);
/// ```
pub struct BoundedTopK<T> {
    capacity: usize,
    heap: BinaryHeap<Ranked<T>>,
}

impl<T> BoundedTopK<T> {
    pub fn new(capacity: usize) -> Self {
        BoundedTopK {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Whether an item with `score` would be kept by [`push`](Self::push).
    pub fn accepts(&self, score: f64) -> bool {
        if self.heap.len() < self.capacity {
            return true;
        }
        self.heap.peek().is_some_and(|min| score > min.score)
    }

    pub fn push(&mut self, score: f64, item: T) {
        if !self.accepts(score) {
            return;
        }
        if self.heap.len() >= self.capacity {
            self.heap.pop();
        }
        self.heap.push(Ranked { score, item });
    }

    /// Folds another selector's entries into this one.
    pub fn merge(&mut self, other: BoundedTopK<T>) {
        for entry in other.heap {
            self.push(entry.score, entry.item);
        }
    }

    /// The lowest kept score, if any.
    pub fn min_score(&self) -> Option<f64> {
        self.heap.peek().map(|min| min.score)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Consumes the selector, best score first.
    pub fn into_sorted_vec(self) -> Vec<(f64, T)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|entry| (entry.score, entry.item))
            .collect()
    }
}

/// Every `chosen`-element subset of group indices, in lexicographic order.
///
/// # Errors
///
/// Returns [`PlanError::InvalidGroupSelection`] if `chosen` is 0 or exceeds
/// the number of groups.
pub fn group_subsets(groups: &GroupDefinition, chosen: usize) -> Result<Vec<Vec<usize>>> {
    let available = groups.len();
    if chosen == 0 || chosen > available {
        return Err(PlanError::InvalidGroupSelection { chosen, available });
    }

    let mut subsets = Vec::new();
    let mut indices: Vec<usize> = (0..chosen).collect();
    loop {
        subsets.push(indices.clone());

        // Rightmost index that can still move forward.
        let Some(pos) = (0..chosen).rev().find(|&i| indices[i] != i + available - chosen) else {
            break;
        };
        indices[pos] += 1;
        for i in pos + 1..chosen {
            indices[i] = indices[i - 1] + 1;
        }
    }
    Ok(subsets)
}

/// Cross product of the locations of the groups in `subset`, first group
/// varying slowest.
pub fn location_combinations(groups: &GroupDefinition, subset: &[usize]) -> Vec<Combination> {
    let selected: Vec<_> = subset
        .iter()
        .filter_map(|&i| groups.groups().get(i))
        .collect();

    let mut tuples: Vec<Vec<String>> = vec![Vec::new()];
    for group in &selected {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                group.locations.iter().map(move |location| {
                    let mut next = prefix.clone();
                    next.push(location.clone());
                    next
                })
            })
            .collect();
    }

    let names: Vec<String> = selected.iter().map(|g| g.name.clone()).collect();
    tuples
        .into_iter()
        .map(|locations| Combination {
            groups: names.clone(),
            locations,
        })
        .collect()
}

/// Number of combinations [`search`] will enumerate.
pub fn count_combinations(groups: &GroupDefinition, chosen: usize) -> Result<usize> {
    Ok(group_subsets(groups, chosen)?
        .iter()
        .map(|subset| {
            subset
                .iter()
                .filter_map(|&i| groups.groups().get(i))
                .map(|g| g.locations.len())
                .product::<usize>()
        })
        .sum())
}

/// Sums the strictly positive effective yields of the combination's locations.
///
/// Ingredients with no positive yield anywhere in the combination are absent.
pub fn aggregate_yield(table: &EffectiveYieldTable, combination: &Combination) -> AggregateYield {
    let mut aggregate = AggregateYield::new();
    for row in &table.rows {
        let total: f64 = combination
            .locations
            .iter()
            .filter_map(|location| row.by_location.get(location))
            .filter(|&&amount| amount > 0.0)
            .sum();
        if total > 0.0 {
            aggregate.insert(row.ingredient.clone(), total);
        }
    }
    aggregate
}

/// Supply/demand ratio of every ingredient the equation demands.
///
/// Ingredients with zero demand place no constraint and are skipped.
///
/// # Errors
///
/// Returns [`PlanError::MissingIngredientYield`] if a demanded ingredient is
/// not produced by the combination.
pub fn supply_ratios(
    aggregate: &AggregateYield,
    demand: &BTreeMap<String, u64>,
    combination: &Combination,
) -> Result<BTreeMap<String, f64>> {
    let mut ratios = BTreeMap::new();
    for (ingredient, &needed) in demand {
        if needed == 0 {
            continue;
        }
        let supplied = aggregate.get(ingredient).copied().ok_or_else(|| {
            PlanError::MissingIngredientYield {
                ingredient: ingredient.clone(),
                combination: combination.locations.clone(),
            }
        })?;
        ratios.insert(ingredient.clone(), supplied / needed as f64);
    }
    Ok(ratios)
}

/// Scales ratios so the largest one is 1.0.
pub fn normalize_ratios(ratios: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let max = ratios.values().copied().fold(0.0, f64::max);
    ratios
        .iter()
        .map(|(ingredient, &ratio)| {
            let share = if max > 0.0 { ratio / max } else { 0.0 };
            (ingredient.clone(), share)
        })
        .collect()
}

/// Scores a combination against one demand vector.
///
/// The ratios are always computed, so a combination that cannot supply a
/// demanded ingredient fails regardless of the ranking mode.
pub fn score_combination(
    aggregate: &AggregateYield,
    demand: &BTreeMap<String, u64>,
    combination: &Combination,
    scoring_ingredient: &str,
    ranking: RankingMode,
) -> Result<f64> {
    let ratios = supply_ratios(aggregate, demand, combination)?;
    let score = match ranking {
        RankingMode::ScoringIngredient => aggregate.get(scoring_ingredient).copied().unwrap_or(0.0),
        RankingMode::Bottleneck => ratios.values().copied().reduce(f64::min).unwrap_or(0.0),
    };
    Ok(score)
}

fn offer(
    top: &mut BoundedTopK<ScoredCombination>,
    excluded: &mut usize,
    scored: Result<f64>,
    combination: &Combination,
    aggregate: &AggregateYield,
) -> Result<()> {
    match scored {
        Ok(score) => {
            if top.accepts(score) {
                top.push(
                    score,
                    ScoredCombination {
                        score,
                        combination: combination.clone(),
                        aggregate: aggregate.clone(),
                    },
                );
            }
            Ok(())
        }
        Err(err @ PlanError::MissingIngredientYield { .. }) => {
            tracing::debug!(error = %err, "combination excluded from ranking");
            *excluded += 1;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Ranks every location combination against both simplified equations.
///
/// Combinations that cannot supply an ingredient an equation demands are
/// left out of that equation's ranking and counted in the outcome.
pub fn search(
    groups: &GroupDefinition,
    table: &EffectiveYieldTable,
    equations: &SimplifiedEquations,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    let chosen = config
        .chosen_groups
        .unwrap_or_else(|| groups.len().saturating_sub(1).max(1));

    let mut level_top = BoundedTopK::new(config.top_k);
    let mut marginal_top = BoundedTopK::new(config.top_k);
    let mut outcome = SearchOutcome::default();

    for subset in group_subsets(groups, chosen)? {
        let combinations = location_combinations(groups, &subset);
        if let Some(first) = combinations.first() {
            tracing::debug!(
                groups = ?first.groups,
                combinations = combinations.len(),
                "scoring group combination"
            );
        }

        for combination in &combinations {
            outcome.evaluated += 1;
            let aggregate = aggregate_yield(table, combination);

            let level_score = score_combination(
                &aggregate,
                &equations.plus_level,
                combination,
                &config.scoring_ingredient,
                config.ranking,
            );
            offer(
                &mut level_top,
                &mut outcome.excluded_level,
                level_score,
                combination,
                &aggregate,
            )?;

            let marginal_score = score_combination(
                &aggregate,
                &equations.plus_n,
                combination,
                &config.scoring_ingredient,
                config.ranking,
            );
            offer(
                &mut marginal_top,
                &mut outcome.excluded_marginal,
                marginal_score,
                combination,
                &aggregate,
            )?;
        }
    }

    outcome.level_top = level_top.into_sorted_vec().into_iter().map(|(_, s)| s).collect();
    outcome.marginal_top = marginal_top.into_sorted_vec().into_iter().map(|(_, s)| s).collect();

    tracing::info!(
        evaluated = outcome.evaluated,
        excluded_level = outcome.excluded_level,
        excluded_marginal = outcome.excluded_marginal,
        "search finished"
    );

    Ok(outcome)
}
