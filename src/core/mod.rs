//! Budget engine: resizing, aggregation, and the mutation API that ties them together.

pub mod aggregation;
pub mod builder;
pub mod resize;
pub mod utils;

pub use aggregation::{AggregationEngine, Aggregates};
pub use builder::{BudgetBuilder, GridRow};
pub use resize::ResizeOperator;
