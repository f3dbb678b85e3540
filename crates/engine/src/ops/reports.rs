//! Read-side aggregation for reports.
//!
//! Pure folds over the already-consistent rows the recompute maintains;
//! nothing here writes.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{MoneyPaise, ResultEngine, deliveries, ledger, purchases};

use super::Engine;

/// Totals over a set of deliveries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryTotals {
    pub cylinders_delivered: i64,
    pub empty_cylinders_received: i64,
    /// delivered − received.
    pub pending_return: i64,
    pub total_amount: MoneyPaise,
    pub payment_cash: MoneyPaise,
    pub payment_upi: MoneyPaise,
    /// Running balance of the ledger-order-last row in the window, summed
    /// per shop when the report spans several shops.
    pub balance: MoneyPaise,
}

/// Running totals over all purchase entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PurchaseTotals {
    pub cylinders_purchased: i64,
    pub empty_cylinders_returned: i64,
    /// purchased − returned.
    pub pending_return: i64,
    pub outstanding: MoneyPaise,
}

impl Engine {
    /// Aggregates deliveries for one shop (or all shops) within a date
    /// window.
    pub async fn delivery_report(
        &self,
        shop_id: Option<i64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<DeliveryTotals> {
        let mut query = deliveries::Entity::find()
            .filter(deliveries::Column::TransactionDate.gte(from))
            .filter(deliveries::Column::TransactionDate.lte(to));
        if let Some(shop_id) = shop_id {
            self.require_shop(&self.database, shop_id).await?;
            query = query.filter(deliveries::Column::ShopId.eq(shop_id));
        }
        let rows = ledger::in_ledger_order(query.order_by_asc(deliveries::Column::ShopId))
            .all(&self.database)
            .await?;

        let mut totals = DeliveryTotals::default();
        // Rows arrive in ledger order per shop, so the last one seen per
        // shop is the window's closing balance for that shop.
        let mut closing_balances: HashMap<i64, i64> = HashMap::new();
        for row in &rows {
            totals.cylinders_delivered += i64::from(row.cylinders_delivered);
            totals.empty_cylinders_received += i64::from(row.empty_cylinders_received);
            totals.total_amount += MoneyPaise::new(row.total_amount_paise);
            totals.payment_cash += MoneyPaise::new(row.payment_cash_paise);
            totals.payment_upi += MoneyPaise::new(row.payment_upi_paise);
            closing_balances.insert(row.shop_id, row.balance_after_paise);
        }
        totals.pending_return = totals.cylinders_delivered - totals.empty_cylinders_received;
        totals.balance = MoneyPaise::new(closing_balances.values().sum());

        Ok(totals)
    }

    /// Aggregates the supply side into its running totals.
    pub async fn purchase_totals(&self) -> ResultEngine<PurchaseTotals> {
        let rows = purchases::Entity::find()
            .order_by_asc(purchases::Column::PurchaseId)
            .all(&self.database)
            .await?;

        let mut totals = PurchaseTotals::default();
        for row in &rows {
            totals.cylinders_purchased += i64::from(row.cylinders_purchased);
            totals.empty_cylinders_returned += i64::from(row.empty_cylinders_returned);
            totals.outstanding += MoneyPaise::new(row.outstanding_paise);
        }
        totals.pending_return = totals.cylinders_purchased - totals.empty_cylinders_returned;

        Ok(totals)
    }
}
