//! # Craftmax
//!
//! A command-line tool and library for planning resource farming in a
//! crafting game.
//!
//! Given the game's recipes, upgrade rules, per-location gathering yields and
//! worker skills, this crate:
//!
//! - Breaks every crafted item down into the primary resources it costs
//! - Turns upgrade rules into linear cost equations (`constant + coefficient * n`)
//! - Scales location yields by the skill of the best workers stationed there
//! - Enumerates every layout that farms one location from each of five of the
//!   six location groups and ranks the best ones
//!
//! ## Modules
//!
//! - [`models`] - Core data structures for recipes, equations and layouts
//! - [`data`] - CSV data loading functionality
//! - [`recipe`] - Recursive recipe decomposition
//! - [`equation`] - Upgrade cost equations
//! - [`yields`] - Worker-scaled location yields
//! - [`search`] - Location combination search and top-K ranking
//! - [`planner`] - The end-to-end pipeline
//! - [`display`] - Output formatting and display utilities
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```no_run
//! use craftmax::{
//!     data::load_all_data,
//!     display::display_results,
//!     models::SearchConfig,
//!     planner::analyze,
//! };
//! use std::path::Path;
//!
//! let snapshot = load_all_data(Path::new("data")).unwrap();
//!
//! // Rank layouts for reaching upgrade level 5
//! let config = SearchConfig { level: 5, ..SearchConfig::default() };
//! let analysis = analyze(&snapshot, &config).unwrap();
//!
//! display_results(&analysis.outcome, &analysis.simplified);
//! ```
//!
//! ## Ranking Modes
//!
//! 1. **Scoring ingredient** (default): layouts are ranked by their yield of
//!    one designated ingredient, typically the scarcest crafting root.
//!
//! 2. **Bottleneck**: layouts are ranked by their lowest supply/demand ratio
//!    across every ingredient the equation needs.

pub mod data;
pub mod display;
pub mod equation;
pub mod error;
pub mod models;
pub mod planner;
pub mod recipe;
pub mod search;
pub mod wasm;
pub mod yields;
