//! Plain-text grid rendering for the budget view.

use crate::core::{Aggregates, GridRow};

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Specifies the configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            alignment,
        }
    }
}

/// Represents a table with column metadata and rows of data to render.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
}

impl Table {
    /// Computes the content widths for each column based on headers and rows.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header).max(column.min_width);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                width
            })
            .collect()
    }

    /// Renders a single row using the provided column widths.
    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let mut lines = vec![
            self.render_row(&header, &widths),
            horizontal_rule(&widths, self.padding),
        ];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Builds the category grid: one row per category, an extra total row under each parent.
pub fn budget_grid(labels: &[String], rows: &[GridRow], decimals: usize) -> Table {
    let mut table = month_table("Category", labels);
    for row in rows {
        let indent = "  ".repeat(row.depth);
        table.rows.push(series_row(
            format!("{}{} [{}]", indent, row.name, row.path),
            &row.values,
            decimals,
        ));
        if row.values != row.total {
            table.rows.push(series_row(
                format!("{}  = {} total", indent, row.name),
                &row.total,
                decimals,
            ));
        }
    }
    table
}

/// Builds the five derived period rows.
pub fn summary_grid(labels: &[String], aggregates: &Aggregates, decimals: usize) -> Table {
    let mut table = month_table("Summary", labels);
    let series = [
        ("Income Total", &aggregates.income_total),
        ("Expense Total", &aggregates.expense_total),
        ("Profit / Loss", &aggregates.profit_loss),
        ("Opening Balance", &aggregates.opening_balance),
        ("Closing Balance", &aggregates.closing_balance),
    ];
    for (label, values) in series {
        table.rows.push(series_row(label.to_string(), values, decimals));
    }
    table
}

pub fn format_amount(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

fn month_table(first: &str, labels: &[String]) -> Table {
    let mut columns = vec![TableColumn::new(first, Alignment::Left)];
    columns.extend(
        labels
            .iter()
            .map(|label| TableColumn::new(label.clone(), Alignment::Right)),
    );
    Table {
        columns,
        rows: Vec::new(),
        padding: 1,
    }
}

fn series_row(label: String, values: &[f64], decimals: usize) -> Vec<String> {
    let mut row = Vec::with_capacity(values.len() + 1);
    row.push(label);
    row.extend(values.iter().map(|value| format_amount(*value, decimals)));
    row
}

fn visible_width(text: &str) -> usize {
    text.chars().count()
}

fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let remaining = width.saturating_sub(visible_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };
    format!(
        "{pad}{}{}{}{pad}",
        " ".repeat(left),
        text,
        " ".repeat(right),
        pad = " ".repeat(padding)
    )
}

fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    let total: usize =
        widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1);
    "-".repeat(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryKind, CategoryPath};

    fn labels() -> Vec<String> {
        vec!["January 2025".into(), "February 2025".into()]
    }

    #[test]
    fn amounts_respect_decimal_places() {
        assert_eq!(format_amount(1234.5, 2), "1234.50");
        assert_eq!(format_amount(-3.0, 0), "-3");
    }

    #[test]
    fn parent_rows_gain_a_total_line() {
        let parent = CategoryPath::root(CategoryKind::Income, 0);
        let rows = vec![
            GridRow {
                path: parent.clone(),
                depth: 0,
                name: "Sales".into(),
                values: vec![1.0, 1.0],
                total: vec![3.0, 1.0],
            },
            GridRow {
                path: parent.child(0),
                depth: 1,
                name: "Online".into(),
                values: vec![2.0, 0.0],
                total: vec![2.0, 0.0],
            },
        ];
        let rendered = budget_grid(&labels(), &rows, 0).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("February 2025"));
        assert!(lines[2].contains("Sales [income/0]"));
        assert!(lines[3].contains("= Sales total"));
        assert!(lines[3].ends_with('1'));
        assert!(lines[4].contains("  Online [income/0/0]"));
    }

    #[test]
    fn summary_lists_five_series() {
        let aggregates = Aggregates {
            income_total: vec![10.0, 10.0],
            expense_total: vec![4.0, 4.0],
            profit_loss: vec![6.0, 6.0],
            opening_balance: vec![0.0, 6.0],
            closing_balance: vec![6.0, 12.0],
        };
        let rendered = summary_grid(&labels(), &aggregates, 0).render();
        assert!(rendered.contains("Closing Balance"));
        assert_eq!(rendered.lines().count(), 7);
        assert!(rendered.lines().last().unwrap().ends_with("12"));
    }
}
