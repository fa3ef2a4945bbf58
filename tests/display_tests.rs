//! Tests for display and formatting utilities.

use std::collections::BTreeMap;

use craftmax::display::{format_demand, format_equation, format_percent};
use craftmax::models::{CostEquation, Term};

#[test]
fn test_format_equation() {
    let equation = CostEquation::from([
        ("branch".to_string(), Term::new(6, 9)),
        ("ore".to_string(), Term::new(0, 3)),
    ]);
    assert_eq!(format_equation(&equation), "branch6+9n, ore0+3n");
}

#[test]
fn test_format_equation_empty() {
    assert_eq!(format_equation(&CostEquation::new()), "");
}

#[test]
fn test_format_demand_largest_first() {
    let demand = BTreeMap::from([
        ("cloth".to_string(), 16),
        ("branch".to_string(), 51),
        ("ore".to_string(), 15),
        ("herb".to_string(), 16),
    ]);
    assert_eq!(format_demand(&demand), "branch51 cloth16 herb16 ore15");
}

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(1.0), "100.0%");
    assert_eq!(format_percent(0.0), "0.0%");
    assert_eq!(format_percent(0.125), "12.5%");
}
