//! Error types for craftmax.

/// Errors raised while loading tables, resolving recipes or scoring layouts.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The recipe graph loops back on itself.
    #[error("recipe for '{item}' is cyclic: {}", path.join(" -> "))]
    CyclicRecipe { item: String, path: Vec<String> },

    /// A cost equation needs an ingredient the combination does not produce.
    #[error("combination ({}) yields no '{ingredient}'", combination.join(", "))]
    MissingIngredientYield {
        ingredient: String,
        combination: Vec<String>,
    },

    /// A recipe or upgrade rule names an item that is neither crafted nor gatherable.
    #[error("unknown item '{item}' referenced by '{referenced_by}'")]
    UnknownItem { item: String, referenced_by: String },

    /// A table row could not be interpreted.
    #[error("{table} line {line}: {reason}")]
    MalformedTableRow {
        table: String,
        line: u64,
        reason: String,
    },

    /// A location was assigned to more than one group.
    #[error("location '{location}' is in both '{first_group}' and '{second_group}'")]
    DuplicateLocation {
        location: String,
        first_group: String,
        second_group: String,
    },

    /// The number of groups to pick is impossible for the group definition.
    #[error("cannot choose {chosen} groups out of {available}")]
    InvalidGroupSelection { chosen: usize, available: usize },

    /// An ingredient count does not fit in 64 bits.
    #[error("quantity of '{item}' overflows")]
    QuantityOverflow { item: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlanError>;
