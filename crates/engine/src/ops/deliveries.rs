//! Delivery mutations and the running-balance recompute.
//!
//! Every mutation follows the same discipline: acquire the shop's ledger
//! lock, then run the store mutation **and** the recompute inside one DB
//! transaction. A failure anywhere rolls the whole operation back, so no
//! caller can observe a ledger where some rows reflect the old fold and some
//! the new one.

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Delivery, DeliveryPatch, EngineError, MoneyPaise, NewDelivery, ResultEngine, deliveries,
    ledger,
};

use super::{Engine, with_store_retry};

impl Engine {
    /// Records a delivery and returns the persisted row, including the
    /// balance derived by the recompute.
    pub async fn record_delivery(&self, new: NewDelivery) -> ResultEngine<Delivery> {
        new.validate()?;
        let _guard = self.lock_shop(new.shop_id).await?;
        with_store_retry!(self, |db_tx| {
            self.require_shop(&db_tx, new.shop_id).await?;

            let inserted = deliveries::ActiveModel::from(&new).insert(&db_tx).await?;
            self.recompute_in_tx(&db_tx, new.shop_id).await?;

            let persisted = deliveries::Entity::find_by_id(inserted.transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("delivery not exists".to_string()))?;
            tracing::debug!(
                shop_id = new.shop_id,
                transaction_id = persisted.transaction_id,
                "recorded delivery"
            );
            Ok(Delivery::from(persisted))
        })
    }

    /// Applies a partial update to a delivery and recomputes the owning
    /// shop's balances.
    ///
    /// A date change may reorder the ledger; the full recompute covers it.
    pub async fn update_delivery(
        &self,
        transaction_id: i64,
        patch: DeliveryPatch,
    ) -> ResultEngine<Delivery> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(EngineError::InvalidEntry(
                "no fields to update".to_string(),
            ));
        }

        let shop_id = self.owning_shop_id(transaction_id).await?;
        let _guard = self.lock_shop(shop_id).await?;
        with_store_retry!(self, |db_tx| {
            // Re-fetch under the lock: the row may have been removed between
            // the unlocked owner lookup and here.
            let row = deliveries::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("delivery not exists".to_string()))?;

            let delivered = patch.cylinders_delivered.unwrap_or(row.cylinders_delivered);
            let price = patch
                .price_per_cylinder
                .map_or(row.price_per_cylinder_paise, MoneyPaise::paise);
            let total = deliveries::total_amount(delivered, MoneyPaise::new(price));

            let active = deliveries::ActiveModel {
                transaction_id: ActiveValue::Set(transaction_id),
                transaction_date: patch
                    .transaction_date
                    .map_or(ActiveValue::NotSet, ActiveValue::Set),
                cylinders_delivered: ActiveValue::Set(delivered),
                empty_cylinders_received: patch
                    .empty_cylinders_received
                    .map_or(ActiveValue::NotSet, ActiveValue::Set),
                price_per_cylinder_paise: ActiveValue::Set(price),
                total_amount_paise: ActiveValue::Set(total.paise()),
                payment_cash_paise: patch
                    .payment_cash
                    .map_or(ActiveValue::NotSet, |v| ActiveValue::Set(v.paise())),
                payment_upi_paise: patch
                    .payment_upi
                    .map_or(ActiveValue::NotSet, |v| ActiveValue::Set(v.paise())),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            self.recompute_in_tx(&db_tx, shop_id).await?;

            let persisted = deliveries::Entity::find_by_id(transaction_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("delivery not exists".to_string()))?;
            Ok(Delivery::from(persisted))
        })
    }

    /// Deletes a delivery and recomputes the owning shop's balances.
    pub async fn delete_delivery(&self, transaction_id: i64) -> ResultEngine<()> {
        let shop_id = self.owning_shop_id(transaction_id).await?;
        let _guard = self.lock_shop(shop_id).await?;
        with_store_retry!(self, |db_tx| {
            let deleted = deliveries::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    "delivery not exists".to_string(),
                ));
            }
            self.recompute_in_tx(&db_tx, shop_id).await?;
            Ok(())
        })
    }

    /// Recomputes the full balance chain for a shop from a fresh snapshot.
    ///
    /// Idempotent: a second call with no intervening mutation updates zero
    /// rows. Returns the number of rows whose stored balance changed.
    pub async fn recompute_shop_balances(&self, shop_id: i64) -> ResultEngine<usize> {
        let _guard = self.lock_shop(shop_id).await?;
        with_store_retry!(self, |db_tx| {
            self.require_shop(&db_tx, shop_id).await?;
            self.recompute_in_tx(&db_tx, shop_id).await
        })
    }

    /// Balance of the ledger-order-last delivery, or zero for an empty shop.
    pub async fn current_balance(&self, shop_id: i64) -> ResultEngine<MoneyPaise> {
        self.require_shop(&self.database, shop_id).await?;
        let rows = self.deliveries_in_ledger_order(&self.database, shop_id).await?;
        Ok(rows
            .last()
            .map_or(MoneyPaise::ZERO, |row| {
                MoneyPaise::new(row.balance_after_paise)
            }))
    }

    /// Lists a shop's deliveries in ledger order. Safe to re-issue.
    pub async fn list_deliveries(&self, shop_id: i64) -> ResultEngine<Vec<Delivery>> {
        self.require_shop(&self.database, shop_id).await?;
        let rows = self.deliveries_in_ledger_order(&self.database, shop_id).await?;
        Ok(rows.into_iter().map(Delivery::from).collect())
    }

    /// Fetch→fold→persist for one shop, inside the caller's transaction.
    ///
    /// Only rows whose stored balance differs from the fold are written.
    pub(crate) async fn recompute_in_tx<C>(&self, db: &C, shop_id: i64) -> ResultEngine<usize>
    where
        C: ConnectionTrait,
    {
        let rows = self.deliveries_in_ledger_order(db, shop_id).await?;
        let balances = ledger::fold_balances(&rows);

        let mut changed = 0usize;
        for (row, balance) in rows.iter().zip(balances) {
            if row.balance_after_paise == balance {
                continue;
            }
            let active = deliveries::ActiveModel {
                transaction_id: ActiveValue::Set(row.transaction_id),
                balance_after_paise: ActiveValue::Set(balance),
                ..Default::default()
            };
            active.update(db).await?;
            changed += 1;
        }
        if changed > 0 {
            tracing::debug!(shop_id, changed, "recomputed running balances");
        }
        Ok(changed)
    }

    async fn deliveries_in_ledger_order<C>(
        &self,
        db: &C,
        shop_id: i64,
    ) -> ResultEngine<Vec<deliveries::Model>>
    where
        C: ConnectionTrait,
    {
        let query = ledger::in_ledger_order(
            deliveries::Entity::find().filter(deliveries::Column::ShopId.eq(shop_id)),
        );
        Ok(query.all(db).await?)
    }

    /// Resolves the shop owning a delivery, without taking any lock.
    async fn owning_shop_id(&self, transaction_id: i64) -> ResultEngine<i64> {
        let row = deliveries::Entity::find_by_id(transaction_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("delivery not exists".to_string()))?;
        Ok(row.shop_id)
    }
}
