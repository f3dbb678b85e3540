//! The canonical ledger ordering and the balance fold.
//!
//! Ledger order is `transaction_date` ascending with `transaction_id`
//! (creation sequence) as the tie-break: event dates are not unique per shop,
//! so date alone is not a total order. Every read of "previous balance" or
//! "latest balance" and every recompute must go through [`in_ledger_order`];
//! reading "the latest" through any other key silently disagrees with the
//! recompute under backdated entries.

use sea_orm::{QueryOrder, Select};

use crate::deliveries::{self, Model};

/// Applies the canonical ledger ordering to a delivery query.
pub(crate) fn in_ledger_order(query: Select<deliveries::Entity>) -> Select<deliveries::Entity> {
    query
        .order_by_asc(deliveries::Column::TransactionDate)
        .order_by_asc(deliveries::Column::TransactionId)
}

/// Net effect of a single row: gross minus both payment channels.
pub(crate) fn net_paise(row: &Model) -> i64 {
    row.total_amount_paise - row.payment_cash_paise - row.payment_upi_paise
}

/// Folds running balances over rows already in ledger order.
///
/// Returns one balance per input row, aligned by index. The result is purely
/// a function of the snapshot: `balance[i] = balance[i-1] + net[i]`,
/// `balance[-1] = 0`.
pub(crate) fn fold_balances(rows: &[Model]) -> Vec<i64> {
    let mut balance = 0i64;
    rows.iter()
        .map(|row| {
            balance += net_paise(row);
            balance
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(id: i64, total: i64, cash: i64, upi: i64) -> Model {
        Model {
            transaction_id: id,
            shop_id: 1,
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            cylinders_delivered: 0,
            empty_cylinders_received: 0,
            price_per_cylinder_paise: 0,
            total_amount_paise: total,
            payment_cash_paise: cash,
            payment_upi_paise: upi,
            balance_after_paise: 0,
        }
    }

    #[test]
    fn fold_starts_from_zero() {
        let rows = vec![row(1, 50000, 30000, 0)];
        assert_eq!(fold_balances(&rows), vec![20000]);
    }

    #[test]
    fn fold_accumulates_net_amounts() {
        let rows = vec![
            row(1, 50000, 30000, 0),
            row(2, 25000, 20000, 5000),
            row(3, 10000, 0, 0),
        ];
        assert_eq!(fold_balances(&rows), vec![20000, 20000, 30000]);
    }

    #[test]
    fn fold_handles_overpayment() {
        let rows = vec![row(1, 10000, 15000, 0)];
        assert_eq!(fold_balances(&rows), vec![-5000]);
    }

    #[test]
    fn fold_of_empty_snapshot_is_empty() {
        assert!(fold_balances(&[]).is_empty());
    }
}
