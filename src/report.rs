//! The spending report: where the money went, by category.

use std::collections::HashMap;

use crate::transaction::Transaction;

/// The label for expenses without a category.
pub const UNCATEGORISED_LABEL: &str = "Other";

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name, or [UNCATEGORISED_LABEL].
    pub category: String,
    /// The amount spent, as a positive number.
    pub total: f64,
    /// The category's share of all spending, between 0 and 1.
    pub share: f64,
    /// How many expenses are in the category.
    pub count: usize,
}

/// Spending grouped by category, largest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpendingReport {
    /// One entry per category.
    pub categories: Vec<CategoryTotal>,
    /// The amount spent across all categories, as a positive number.
    pub total: f64,
}

/// Group `expenses` by category and total them.
///
/// Only negative amounts count; anything else in `expenses` is ignored.
/// Categories are sorted by total, largest first, then by name, with
/// [UNCATEGORISED_LABEL] last.
pub fn spending_report(expenses: &[Transaction]) -> SpendingReport {
    let mut totals_by_category: HashMap<&str, (f64, usize)> = HashMap::new();

    for expense in expenses.iter().filter(|t| t.is_expense()) {
        let category = expense
            .category
            .as_deref()
            .unwrap_or(UNCATEGORISED_LABEL);
        let entry = totals_by_category.entry(category).or_insert((0.0, 0));
        entry.0 += expense.amount.abs();
        entry.1 += 1;
    }

    let total = totals_by_category
        .values()
        .fold(0.0, |total, (sum, _)| total + sum);

    let mut categories: Vec<CategoryTotal> = totals_by_category
        .into_iter()
        .map(|(category, (sum, count))| CategoryTotal {
            category: category.to_owned(),
            total: sum,
            share: if total > 0.0 { sum / total } else { 0.0 },
            count,
        })
        .collect();

    categories.sort_by(|a, b| {
        let a_other = a.category == UNCATEGORISED_LABEL;
        let b_other = b.category == UNCATEGORISED_LABEL;

        a_other
            .cmp(&b_other)
            .then_with(|| b.total.total_cmp(&a.total))
            .then_with(|| a.category.cmp(&b.category))
    });

    SpendingReport { categories, total }
}
