//! Worker-scaled location yields.

use std::collections::HashMap;

use crate::models::{EffectiveYieldRow, EffectiveYieldTable, LocationTable};

/// Number of workers whose skill counts toward a location's multiplier.
pub const TOP_WORKERS: usize = 3;

/// Sum of the [`TOP_WORKERS`] highest skills at `location`, divided by 100.
///
/// With fewer workers than that, only the existing workers are summed.
/// Ties at the cut-off rank keep table order (stable sort); this only
/// changes which worker is picked, never the sum.
///
/// # Example
///
/// ```
/// use craftmax::models::{LocationRow, LocationTable};
/// use craftmax::yields::location_multiplier;
///
/// let workers = LocationTable {
///     locations: vec!["Harbor".into()],
///     rows: vec![
///         LocationRow { name: "Ada".into(), values: vec![10] },
///         LocationRow { name: "Bo".into(), values: vec![20] },
///     ],
/// };
/// assert!((location_multiplier(&workers, "Harbor") - 0.30).abs() < 1e-9);
/// ```
pub fn location_multiplier(workers: &LocationTable, location: &str) -> f64 {
    let mut skills: Vec<u32> = workers.column(location).collect();
    skills.sort_by(|a, b| b.cmp(a));
    let total: u64 = skills.iter().take(TOP_WORKERS).map(|&s| u64::from(s)).sum();
    total as f64 / 100.0
}

/// Multiplier for every location column of the worker table.
pub fn location_multipliers(workers: &LocationTable) -> HashMap<String, f64> {
    workers
        .locations
        .iter()
        .map(|location| (location.clone(), location_multiplier(workers, location)))
        .collect()
}

/// Scales every raw map yield by its location's multiplier.
///
/// Locations without a worker column get a multiplier of 0.
pub fn effective_yields(
    map: &LocationTable,
    multipliers: &HashMap<String, f64>,
) -> EffectiveYieldTable {
    for location in &map.locations {
        if !multipliers.contains_key(location) {
            tracing::warn!(location = %location, "no worker column for location, yields count as 0");
        }
    }

    let rows = map
        .rows
        .iter()
        .map(|row| EffectiveYieldRow {
            ingredient: row.name.clone(),
            by_location: map
                .locations
                .iter()
                .zip(&row.values)
                .map(|(location, &raw)| {
                    let multiplier = multipliers.get(location).copied().unwrap_or(0.0);
                    (location.clone(), raw as f64 * multiplier)
                })
                .collect(),
        })
        .collect();

    EffectiveYieldTable { rows }
}
