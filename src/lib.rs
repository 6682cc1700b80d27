// Product Catalog - Core Library
// Exposes the catalog and query evaluator for the CLI, the API server, and tests

pub mod catalog;
pub mod error;
pub mod logging;
pub mod product;
pub mod query;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult, QueryError};
pub use product::{Product, ProductType, RiskLevel};
pub use query::{ProductFilter, ProductQuery, RateRange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Label of the tab that shows every category
pub const ALL_CATEGORIES: &str = "Todos";

/// Tab labels for a catalog: the "all" tab followed by each category
pub fn category_tabs(catalog: &Catalog) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES)
        .chain(catalog.categories())
        .map(String::from)
        .collect()
}
