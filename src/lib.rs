#![doc(test(attr(deny(warnings))))]

//! Budget Builder keeps a hierarchical income/expense budget consistent: category totals,
//! profit/loss, and running balances are re-derived after every edit or window change.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod utils;

pub use crate::core::{AggregationEngine, Aggregates, BudgetBuilder, GridRow, ResizeOperator};
pub use domain::{Category, CategoryForest, CategoryKind, CategoryPath, PeriodWindow};
pub use errors::{BudgetError, BudgetResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Builder tracing initialized.");
    });
}
