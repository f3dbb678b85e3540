use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{NewPurchase, Purchase, ResultEngine, purchases};

use super::Engine;

impl Engine {
    /// Records a supply-side purchase. Append-only: there is no amend or
    /// delete path, so no lock and no recompute.
    pub async fn record_purchase(&self, new: NewPurchase) -> ResultEngine<Purchase> {
        new.validate()?;
        let inserted = purchases::ActiveModel::from(&new)
            .insert(&self.database)
            .await?;
        tracing::debug!(purchase_id = inserted.purchase_id, "recorded purchase");
        Ok(Purchase::from(inserted))
    }

    /// Lists purchases within a date window, oldest first.
    pub async fn list_purchases(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<Vec<Purchase>> {
        let models = purchases::Entity::find()
            .filter(purchases::Column::PurchaseDate.gte(from))
            .filter(purchases::Column::PurchaseDate.lte(to))
            .order_by_asc(purchases::Column::PurchaseDate)
            .order_by_asc(purchases::Column::PurchaseId)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Purchase::from).collect())
    }
}
