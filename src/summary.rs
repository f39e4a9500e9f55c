use rust_decimal::Decimal;

use crate::transaction::Transaction;

/// One row of the per-category expense summary
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Groups transactions by category and sums their amounts
///
/// The result is sorted by total descending; equal totals are ordered by
/// category name ascending so the table is stable across runs. Transactions
/// with a missing amount contribute nothing to their category.
pub fn summarize(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions {
        let Some(amount) = transaction.amount() else {
            continue;
        };
        match totals
            .iter_mut()
            .find(|row| row.category == transaction.category())
        {
            Some(row) => row.total += amount,
            None => totals.push(CategoryTotal {
                category: transaction.category().to_string(),
                total: amount,
            }),
        }
    }
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Sums the amounts of all debit transactions (`amount < 0`)
pub fn total_negative(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter_map(Transaction::amount)
        .filter(|amount| *amount < Decimal::ZERO)
        .sum()
}
