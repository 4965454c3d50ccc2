use serde::Serialize;

use crate::domain::{category::finite_or_zero, Category, CategoryForest, PeriodWindow};

/// Per-month derived series for the whole forest.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Aggregates {
    pub income_total: Vec<f64>,
    pub expense_total: Vec<f64>,
    pub profit_loss: Vec<f64>,
    pub opening_balance: Vec<f64>,
    pub closing_balance: Vec<f64>,
}

impl Aggregates {
    pub fn month_count(&self) -> usize {
        self.profit_loss.len()
    }

    /// Balance carried past the final month of the window.
    pub fn final_balance(&self) -> f64 {
        self.closing_balance.last().copied().unwrap_or_default()
    }
}

/// Derives every aggregate from the current forest and window.
pub struct AggregationEngine;

impl AggregationEngine {
    pub fn compute(forest: &CategoryForest, window: &PeriodWindow) -> Aggregates {
        let month_count = window.month_count();
        let income_total = Self::sum_roots(&forest.income, month_count);
        let expense_total = Self::sum_roots(&forest.expense, month_count);
        let profit_loss: Vec<f64> = income_total
            .iter()
            .zip(&expense_total)
            .map(|(income, expense)| income - expense)
            .collect();
        let (opening_balance, closing_balance) = Self::balances(&profit_loss);

        Aggregates {
            income_total,
            expense_total,
            profit_loss,
            opening_balance,
            closing_balance,
        }
    }

    /// Month-wise sum of each root's total; missing or non-finite entries count as zero.
    pub fn sum_roots(roots: &[Category], month_count: usize) -> Vec<f64> {
        let mut totals = vec![0.0; month_count];
        for root in roots {
            for (slot, value) in totals.iter_mut().zip(root.total()) {
                *slot += finite_or_zero(value);
            }
        }
        totals
    }

    /// Opening and closing balances in one left-to-right pass.
    pub fn balances(profit_loss: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut opening = Vec::with_capacity(profit_loss.len());
        let mut closing = Vec::with_capacity(profit_loss.len());
        let mut carried = 0.0;
        for value in profit_loss {
            opening.push(carried);
            carried += value;
            closing.push(carried);
        }
        (opening, closing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balances_carry_previous_profit() {
        let (opening, closing) = AggregationEngine::balances(&[100.0, -30.0, 50.0]);
        assert_eq!(opening, vec![0.0, 100.0, 70.0]);
        assert_eq!(closing, vec![100.0, 70.0, 120.0]);
    }

    #[test]
    fn empty_forest_yields_zero_series() {
        let window = PeriodWindow::default();
        let aggregates = AggregationEngine::compute(&CategoryForest::new(), &window);
        assert_eq!(aggregates.month_count(), 12);
        assert!(aggregates.closing_balance.iter().all(|value| *value == 0.0));
        assert_eq!(aggregates.final_balance(), 0.0);
    }

    #[test]
    fn sum_roots_is_sized_to_window_even_with_short_series() {
        let roots = vec![Category::new("Short", 1)];
        assert_eq!(AggregationEngine::sum_roots(&roots, 3), vec![0.0, 0.0, 0.0]);
    }
}
