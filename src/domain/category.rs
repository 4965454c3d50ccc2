//! Domain types representing budget categories and how callers address them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BudgetError;

/// A named budget line with per-month amounts and exclusively owned subcategories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    values: Vec<f64>,
    children: Vec<Category>,
}

impl Category {
    /// Creates a zero-filled category sized to `month_count`.
    pub fn new(name: impl Into<String>, month_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            values: vec![0.0; month_count],
            children: Vec::new(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn children(&self) -> &[Category] {
        &self.children
    }

    /// Own values plus the recursive sum of every descendant, per month.
    pub fn total(&self) -> Vec<f64> {
        let mut totals: Vec<f64> = self.values.iter().copied().map(finite_or_zero).collect();
        for child in &self.children {
            for (slot, value) in totals.iter_mut().zip(child.total()) {
                *slot += value;
            }
        }
        totals
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<f64> {
        &mut self.values
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Category> {
        &mut self.children
    }

    pub(crate) fn child(&self, index: usize) -> Option<&Category> {
        self.children.get(index)
    }

    pub(crate) fn child_mut(&mut self, index: usize) -> Option<&mut Category> {
        self.children.get_mut(index)
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Selects which root collection of the forest a category lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for CategoryKind {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "inc" => Ok(CategoryKind::Income),
            "expense" | "expenses" | "exp" => Ok(CategoryKind::Expense),
            other => Err(BudgetError::InvalidPath(other.to_string())),
        }
    }
}

/// Position of a category in the forest: root index followed by child indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryPath {
    pub kind: CategoryKind,
    indices: Vec<usize>,
}

impl CategoryPath {
    pub fn root(kind: CategoryKind, index: usize) -> Self {
        Self {
            kind,
            indices: vec![index],
        }
    }

    /// Path of the `index`-th child of this category.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self {
            kind: self.kind,
            indices,
        }
    }

    /// Path of the enclosing category, `None` for roots.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut indices = self.indices.clone();
        indices.pop();
        Some(Self {
            kind: self.kind,
            indices,
        })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Index of this category inside its parent (or root) collection.
    pub fn last_index(&self) -> usize {
        self.indices.last().copied().unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.indices.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.indices.len() - 1
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for index in &self.indices {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for CategoryPath {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BudgetError::InvalidPath(s.to_string());
        let mut segments = s.trim().split('/');
        let kind = segments
            .next()
            .ok_or_else(invalid)?
            .parse::<CategoryKind>()
            .map_err(|_| invalid())?;
        let indices = segments
            .map(|segment| segment.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        if indices.is_empty() {
            return Err(invalid());
        }
        Ok(Self { kind, indices })
    }
}
