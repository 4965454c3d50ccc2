use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, CategoryKind, CategoryPath};

/// The two top-level ordered collections of root categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryForest {
    pub income: Vec<Category>,
    pub expense: Vec<Category>,
}

impl CategoryForest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self, kind: CategoryKind) -> &[Category] {
        match kind {
            CategoryKind::Income => &self.income,
            CategoryKind::Expense => &self.expense,
        }
    }

    pub(crate) fn roots_mut(&mut self, kind: CategoryKind) -> &mut Vec<Category> {
        match kind {
            CategoryKind::Income => &mut self.income,
            CategoryKind::Expense => &mut self.expense,
        }
    }

    pub fn get(&self, path: &CategoryPath) -> Option<&Category> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.roots(path.kind).get(*first)?;
        for index in rest {
            current = current.child(*index)?;
        }
        Some(current)
    }

    pub(crate) fn get_mut(&mut self, path: &CategoryPath) -> Option<&mut Category> {
        let (first, rest) = path.indices().split_first()?;
        let mut current = self.roots_mut(path.kind).get_mut(*first)?;
        for index in rest {
            current = current.child_mut(*index)?;
        }
        Some(current)
    }

    /// Every category, depth-first, income roots before expense roots.
    pub fn walk(&self) -> Vec<(CategoryPath, &Category)> {
        let mut out = Vec::new();
        for kind in [CategoryKind::Income, CategoryKind::Expense] {
            for (index, root) in self.roots(kind).iter().enumerate() {
                collect(CategoryPath::root(kind, index), root, &mut out);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expense.is_empty()
    }
}

fn collect<'a>(
    path: CategoryPath,
    category: &'a Category,
    out: &mut Vec<(CategoryPath, &'a Category)>,
) {
    let children = category.children();
    out.push((path.clone(), category));
    for (index, child) in children.iter().enumerate() {
        collect(path.child(index), child, out);
    }
}
