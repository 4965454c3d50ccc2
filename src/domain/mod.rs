//! Budget domain models: the category tree, the forest of roots, and the period window.

pub mod category;
pub mod forest;
pub mod window;

pub use category::{Category, CategoryKind, CategoryPath};
pub use forest::CategoryForest;
pub use window::{parse_month, PeriodWindow};
