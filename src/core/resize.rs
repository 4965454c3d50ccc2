use tracing::debug;

use crate::domain::{Category, CategoryForest};

/// Adapts monthly value series to a new month count while keeping the overlap.
pub struct ResizeOperator;

impl ResizeOperator {
    /// Resizes every root of both collections, top-down.
    pub fn resize_forest(forest: &mut CategoryForest, month_count: usize) {
        debug!(month_count, "resizing forest");
        for root in forest.income.iter_mut().chain(forest.expense.iter_mut()) {
            Self::resize(root, month_count);
        }
    }

    /// Truncates or zero-extends `category` and all of its descendants.
    pub fn resize(category: &mut Category, month_count: usize) {
        category.values_mut().resize(month_count, 0.0);
        for child in category.children_mut() {
            Self::resize(child, month_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(values: &[f64]) -> Category {
        let mut category = Category::new("Seed", values.len());
        category.values_mut().copy_from_slice(values);
        category
    }

    #[test]
    fn growing_zero_fills_new_months() {
        let mut category = seeded(&[1.0, 2.0]);
        ResizeOperator::resize(&mut category, 4);
        assert_eq!(category.values(), &[1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn shrinking_keeps_leading_months() {
        let mut category = seeded(&[1.0, 2.0, 3.0]);
        ResizeOperator::resize(&mut category, 1);
        assert_eq!(category.values(), &[1.0]);
        ResizeOperator::resize(&mut category, 3);
        assert_eq!(category.values(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn resize_reaches_every_descendant() {
        let mut root = seeded(&[1.0]);
        let mut child = seeded(&[2.0]);
        child.children_mut().push(seeded(&[3.0]));
        root.children_mut().push(child);
        let mut forest = CategoryForest::new();
        forest.expense.push(root);

        ResizeOperator::resize_forest(&mut forest, 3);

        let grandchild = &forest.expense[0].children()[0].children()[0];
        assert_eq!(grandchild.values(), &[3.0, 0.0, 0.0]);
        assert_eq!(forest.expense[0].children()[0].values().len(), 3);
    }
}
