use thiserror::Error;

/// Error type that captures budget addressing and configuration failures.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Index {index} is out of range for {len} categories")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Month {index} is outside the {month_count}-month window")]
    MonthOutOfRange { index: usize, month_count: usize },
    #[error("Invalid category path `{0}` (use income/0 or expense/1/2)")]
    InvalidPath(String),
    #[error("Invalid month `{0}` (use YYYY-MM)")]
    InvalidMonth(String),
}

pub type BudgetResult<T> = Result<T, BudgetError>;
