//! The budget engine instance: owns the forest and window and keeps aggregates current.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::core::aggregation::{AggregationEngine, Aggregates};
use crate::core::resize::ResizeOperator;
use crate::domain::{Category, CategoryForest, CategoryKind, CategoryPath, PeriodWindow};
use crate::errors::{BudgetError, BudgetResult};

/// Flattened view of one category for grid front ends.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridRow {
    #[serde(serialize_with = "serialize_path")]
    pub path: CategoryPath,
    pub depth: usize,
    pub name: String,
    pub values: Vec<f64>,
    pub total: Vec<f64>,
}

fn serialize_path<S: serde::Serializer>(path: &CategoryPath, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(path)
}

/// Every mutating method recomputes [`Aggregates`] before it returns, so readers never observe
/// stale totals.
#[derive(Debug, Clone)]
pub struct BudgetBuilder {
    forest: CategoryForest,
    window: PeriodWindow,
    aggregates: Aggregates,
}

impl Default for BudgetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetBuilder {
    /// Empty forest over the default one-year window.
    pub fn new() -> Self {
        Self::with_window(PeriodWindow::default())
    }

    pub fn with_window(window: PeriodWindow) -> Self {
        let forest = CategoryForest::new();
        let aggregates = AggregationEngine::compute(&forest, &window);
        Self {
            forest,
            window,
            aggregates,
        }
    }

    /// Default window seeded with the stock income and expense lines.
    pub fn with_default_categories() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::with_window(config.window());
        for name in &config.income_categories {
            builder.add_root_category(CategoryKind::Income, name.clone());
        }
        for name in &config.expense_categories {
            builder.add_root_category(CategoryKind::Expense, name.clone());
        }
        builder
    }

    pub fn forest(&self) -> &CategoryForest {
        &self.forest
    }

    pub fn window(&self) -> &PeriodWindow {
        &self.window
    }

    pub fn month_count(&self) -> usize {
        self.window.month_count()
    }

    pub fn month_labels(&self) -> Vec<String> {
        self.window.month_labels()
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn income_total(&self) -> &[f64] {
        &self.aggregates.income_total
    }

    pub fn expense_total(&self) -> &[f64] {
        &self.aggregates.expense_total
    }

    pub fn profit_loss(&self) -> &[f64] {
        &self.aggregates.profit_loss
    }

    pub fn opening_balance(&self) -> &[f64] {
        &self.aggregates.opening_balance
    }

    pub fn closing_balance(&self) -> &[f64] {
        &self.aggregates.closing_balance
    }

    pub fn category(&self, path: &CategoryPath) -> Option<&Category> {
        self.forest.get(path)
    }

    pub fn category_total(&self, path: &CategoryPath) -> Option<Vec<f64>> {
        self.forest.get(path).map(Category::total)
    }

    /// Current path of the category carrying `id`.
    pub fn locate(&self, id: Uuid) -> Option<CategoryPath> {
        self.forest
            .walk()
            .into_iter()
            .find(|(_, category)| category.id == id)
            .map(|(path, _)| path)
    }

    pub fn rows(&self) -> Vec<GridRow> {
        self.forest
            .walk()
            .into_iter()
            .map(|(path, category)| GridRow {
                depth: path.depth(),
                name: category.name.clone(),
                values: category.values().to_vec(),
                total: category.total(),
                path,
            })
            .collect()
    }

    pub fn add_root_category(&mut self, kind: CategoryKind, name: impl Into<String>) -> CategoryPath {
        let category = Category::new(name, self.month_count());
        let roots = self.forest.roots_mut(kind);
        roots.push(category);
        let path = CategoryPath::root(kind, roots.len() - 1);
        debug!(%path, "added root category");
        self.recompute();
        path
    }

    pub fn add_subcategory(
        &mut self,
        parent: &CategoryPath,
        name: impl Into<String>,
    ) -> BudgetResult<CategoryPath> {
        let month_count = self.month_count();
        let category = self.require_mut(parent)?;
        category.children_mut().push(Category::new(name, month_count));
        let path = parent.child(category.children().len() - 1);
        debug!(%path, "added subcategory");
        self.recompute();
        Ok(path)
    }

    pub fn delete_root_category(&mut self, kind: CategoryKind, index: usize) -> BudgetResult<Category> {
        let removed = remove_at(self.forest.roots_mut(kind), index)?;
        debug!(%kind, index, name = %removed.name, "deleted root category");
        self.recompute();
        Ok(removed)
    }

    pub fn delete_subcategory(
        &mut self,
        parent: &CategoryPath,
        index: usize,
    ) -> BudgetResult<Category> {
        let category = self.require_mut(parent)?;
        let removed = remove_at(category.children_mut(), index)?;
        debug!(%parent, index, name = %removed.name, "deleted subcategory");
        self.recompute();
        Ok(removed)
    }

    /// Deletes whatever `path` points at, root or subcategory.
    pub fn delete(&mut self, path: &CategoryPath) -> BudgetResult<Category> {
        match path.parent() {
            Some(parent) => self.delete_subcategory(&parent, path.last_index()),
            None => self.delete_root_category(path.kind, path.last_index()),
        }
    }

    /// Non-finite values are stored as zero.
    pub fn set_value(
        &mut self,
        path: &CategoryPath,
        month_index: usize,
        value: f64,
    ) -> BudgetResult<()> {
        let value = if value.is_finite() {
            value
        } else {
            warn!(%path, month_index, "non-finite value coerced to zero");
            0.0
        };
        let slot = self.month_slot(path, month_index)?;
        *slot = value;
        debug!(%path, month_index, value, "value updated");
        self.recompute();
        Ok(())
    }

    /// Copies the value at `month_index` into every month of the row, origin included.
    pub fn apply_to_all_months(&mut self, path: &CategoryPath, month_index: usize) -> BudgetResult<()> {
        let value = *self.month_slot(path, month_index)?;
        let category = self.require_mut(path)?;
        category.values_mut().fill(value);
        debug!(%path, month_index, value, "value applied to all months");
        self.recompute();
        Ok(())
    }

    pub fn update_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let previous = self.month_count();
        self.window.set_range(start, end);
        let month_count = self.month_count();
        debug!(window = %self.window, previous, month_count, "date range updated");
        ResizeOperator::resize_forest(&mut self.forest, month_count);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.aggregates = AggregationEngine::compute(&self.forest, &self.window);
    }

    fn require_mut(&mut self, path: &CategoryPath) -> BudgetResult<&mut Category> {
        self.forest.get_mut(path).ok_or_else(|| {
            warn!(%path, "category not found");
            BudgetError::CategoryNotFound(path.to_string())
        })
    }

    fn month_slot(&mut self, path: &CategoryPath, month_index: usize) -> BudgetResult<&mut f64> {
        let month_count = self.month_count();
        let category = self.require_mut(path)?;
        category.values_mut().get_mut(month_index).ok_or_else(|| {
            warn!(%path, month_index, month_count, "month index out of range");
            BudgetError::MonthOutOfRange {
                index: month_index,
                month_count,
            }
        })
    }
}

fn remove_at(items: &mut Vec<Category>, index: usize) -> BudgetResult<Category> {
    if index >= items.len() {
        warn!(index, len = items.len(), "delete index out of range");
        return Err(BudgetError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}
