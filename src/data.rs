//! Data loading functionality for craftmax.
//!
//! This module handles loading the input tables from CSV files located in
//! the `data/` directory. Every loader has a reader-based variant so the
//! same parsing runs on files and on in-memory text (see [`crate::wasm`]).

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{PlanError, Result};
use crate::models::{
    Group, GroupDefinition, GroupRow, LocationRow, LocationTable, Recipe, RecipeBook, RecipeRow,
    UpgradeRow, UpgradeRule,
};

/// Every input table, parsed.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub recipes: RecipeBook,
    /// Raw ingredient yield per location
    pub map: LocationTable,
    /// Worker skill multiplier per location
    pub workers: LocationTable,
    pub upgrades: Vec<UpgradeRule>,
    pub groups: GroupDefinition,
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(csv::Trim::All).from_reader(source)
}

fn malformed(table: &str, record: &StringRecord, reason: String) -> PlanError {
    PlanError::MalformedTableRow {
        table: table.to_string(),
        line: record.position().map(|p| p.line()).unwrap_or(0),
        reason,
    }
}

/// Reads recipe rows into a [`RecipeBook`].
///
/// # CSV Format
///
/// Expected columns: `item, ingredient1, quantity1, ingredient2, quantity2`
pub fn read_recipes<R: Read>(source: R) -> Result<RecipeBook> {
    let mut rdr = reader(source);
    let headers = rdr.headers()?.clone();
    let mut recipes = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: RecipeRow = record.deserialize(Some(&headers))?;
        if row.item.is_empty() || row.ingredient1.is_empty() || row.ingredient2.is_empty() {
            return Err(malformed(
                "recipes",
                &record,
                "item and both ingredients must be named".to_string(),
            ));
        }
        recipes.push(Recipe::new(
            &row.item,
            (&row.ingredient1, row.quantity1),
            (&row.ingredient2, row.quantity2),
        ));
    }
    Ok(RecipeBook::from_recipes(recipes))
}

/// Reads a table whose header row lists location names after an empty
/// leading cell.
///
/// # CSV Format
///
/// ```text
/// ,Harbor,Pond
/// branch,3,
/// shell,,7
/// ```
///
/// Empty or missing cells are 0.
pub fn read_location_table<R: Read>(source: R, table: &str) -> Result<LocationTable> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let locations: Vec<String> = rdr.headers()?.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let name = record.get(0).unwrap_or("");
        if name.is_empty() {
            return Err(malformed(table, &record, "row has no name".to_string()));
        }
        if record.len() > locations.len() + 1 {
            return Err(malformed(
                table,
                &record,
                format!("{} cells for {} locations", record.len() - 1, locations.len()),
            ));
        }

        let mut values = Vec::with_capacity(locations.len());
        for (column, location) in locations.iter().enumerate() {
            let cell = record.get(column + 1).unwrap_or("");
            let value = if cell.is_empty() {
                0
            } else {
                cell.parse::<u32>().map_err(|e| {
                    malformed(table, &record, format!("{} at '{}': {}", cell, location, e))
                })?
            };
            values.push(value);
        }
        rows.push(LocationRow {
            name: name.to_string(),
            values,
        });
    }

    Ok(LocationTable { locations, rows })
}

/// Reads upgrade rules.
///
/// # CSV Format
///
/// Expected columns: `item, sub_item, quantity`
pub fn read_upgrades<R: Read>(source: R) -> Result<Vec<UpgradeRule>> {
    let mut rdr = reader(source);
    let mut rules = Vec::new();
    for result in rdr.deserialize() {
        let row: UpgradeRow = result?;
        rules.push(UpgradeRule {
            item: row.item,
            sub_item: row.sub_item,
            quantity: row.quantity,
        });
    }
    Ok(rules)
}

/// Reads the group definition. Groups keep the order they first appear in.
///
/// # CSV Format
///
/// Expected columns: `group, location`
pub fn read_groups<R: Read>(source: R) -> Result<GroupDefinition> {
    let mut rdr = reader(source);
    let mut groups: Vec<Group> = Vec::new();
    for result in rdr.deserialize() {
        let row: GroupRow = result?;
        match groups.iter_mut().find(|g| g.name == row.group) {
            Some(group) => group.locations.push(row.location),
            None => groups.push(Group {
                name: row.group,
                locations: vec![row.location],
            }),
        }
    }
    GroupDefinition::new(groups)
}

/// Parses all five tables from in-memory CSV text.
pub fn parse_snapshot(
    recipes: &str,
    map: &str,
    workers: &str,
    upgrades: &str,
    groups: &str,
) -> Result<Snapshot> {
    Ok(Snapshot {
        recipes: read_recipes(recipes.as_bytes())?,
        map: read_location_table(map.as_bytes(), "map")?,
        workers: read_location_table(workers.as_bytes(), "worker")?,
        upgrades: read_upgrades(upgrades.as_bytes())?,
        groups: read_groups(groups.as_bytes())?,
    })
}

/// Loads all tables from the data directory.
///
/// Expects `recipes.csv`, `map.csv`, `worker.csv`, `upgrade.csv` and
/// `groups.csv` inside `data_dir`.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use craftmax::data::load_all_data;
///
/// let snapshot = load_all_data(Path::new("data")).unwrap();
/// println!("Loaded {} recipes", snapshot.recipes.len());
/// ```
pub fn load_all_data(data_dir: &Path) -> Result<Snapshot> {
    let snapshot = Snapshot {
        recipes: read_recipes(File::open(data_dir.join("recipes.csv"))?)?,
        map: read_location_table(File::open(data_dir.join("map.csv"))?, "map")?,
        workers: read_location_table(File::open(data_dir.join("worker.csv"))?, "worker")?,
        upgrades: read_upgrades(File::open(data_dir.join("upgrade.csv"))?)?,
        groups: read_groups(File::open(data_dir.join("groups.csv"))?)?,
    };

    tracing::info!(
        recipes = snapshot.recipes.len(),
        ingredients = snapshot.map.rows.len(),
        workers = snapshot.workers.rows.len(),
        upgrades = snapshot.upgrades.len(),
        groups = snapshot.groups.len(),
        "loaded tables from {}",
        data_dir.display()
    );

    Ok(snapshot)
}
