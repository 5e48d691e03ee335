//! Category filter for the product grid.

use std::fmt;

/// Query value that selects every category.
pub const ALL_CATEGORIES: &str = "all";

/// Which slice of the catalog the product grid shows.
///
/// Kept as an enum rather than a magic string so that "show everything" can
/// never be confused with a real category name during filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Every product.
    #[default]
    All,
    /// Products whose category matches exactly.
    Named(String),
}

impl CategoryFilter {
    /// Interpret a `?category=` query value.
    ///
    /// Absent, empty, and `"all"` select [`CategoryFilter::All`]; any other
    /// value is an exact category name.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            None | Some("" | ALL_CATEGORIES) => Self::All,
            Some(name) => Self::Named(name.to_string()),
        }
    }

    /// Returns true if a product in `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }

    /// The query value that round-trips through [`CategoryFilter::from_query`].
    #[must_use]
    pub fn as_query(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}
