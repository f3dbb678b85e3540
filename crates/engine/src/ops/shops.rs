use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{EngineError, NewShop, ResultEngine, Shop, ShopPatch, deliveries, shops};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a shop. Names are unique case-insensitively.
    pub async fn create_shop(&self, new: NewShop) -> ResultEngine<Shop> {
        new.validate()?;
        let name = new.shop_name.trim().to_string();
        with_tx!(self, |db_tx| {
            let exists = shops::Entity::find()
                .filter(Expr::cust("LOWER(shop_name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let inserted = shops::ActiveModel::from(&new).insert(&db_tx).await?;
            Ok(Shop::from(inserted))
        })
    }

    /// Return a shop by id.
    pub async fn shop(&self, shop_id: i64) -> ResultEngine<Shop> {
        let model = self.require_shop(&self.database, shop_id).await?;
        Ok(Shop::from(model))
    }

    /// Lists all shops ordered by name.
    pub async fn list_shops(&self) -> ResultEngine<Vec<Shop>> {
        let models = shops::Entity::find()
            .order_by_asc(shops::Column::ShopName)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Shop::from).collect())
    }

    /// Applies a partial update to a shop's contact fields.
    pub async fn update_shop(&self, shop_id: i64, patch: ShopPatch) -> ResultEngine<Shop> {
        patch.validate()?;
        with_tx!(self, |db_tx| {
            self.require_shop(&db_tx, shop_id).await?;

            if let Some(name) = &patch.shop_name {
                let name = name.trim().to_string();
                let exists = shops::Entity::find()
                    .filter(Expr::cust("LOWER(shop_name)").eq(name.to_lowercase()))
                    .filter(shops::Column::ShopId.ne(shop_id))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if exists {
                    return Err(EngineError::ExistingKey(name));
                }
            }

            let active = shops::ActiveModel {
                shop_id: ActiveValue::Set(shop_id),
                shop_name: patch
                    .shop_name
                    .as_ref()
                    .map_or(ActiveValue::NotSet, |n| {
                        ActiveValue::Set(n.trim().to_string())
                    }),
                mobile_number: patch
                    .mobile_number
                    .clone()
                    .map_or(ActiveValue::NotSet, ActiveValue::Set),
                address: patch
                    .address
                    .clone()
                    .map_or(ActiveValue::NotSet, ActiveValue::Set),
            };
            let updated = active.update(&db_tx).await?;
            Ok(Shop::from(updated))
        })
    }

    /// Deletes a shop.
    ///
    /// Refused while deliveries still reference it: orphaned rows would keep
    /// a balance chain with no owner. Callers must delete or transfer the
    /// deliveries first. Holds the ledger lock so a racing delivery cannot
    /// slip between the emptiness check and the delete.
    pub async fn delete_shop(&self, shop_id: i64) -> ResultEngine<()> {
        let _guard = self.lock_shop(shop_id).await?;
        with_tx!(self, |db_tx| {
            let shop = self.require_shop(&db_tx, shop_id).await?;

            let transactions = deliveries::Entity::find()
                .filter(deliveries::Column::ShopId.eq(shop_id))
                .count(&db_tx)
                .await?;
            if transactions > 0 {
                return Err(EngineError::ShopNotEmpty(shop.shop_name));
            }

            shops::Entity::delete_by_id(shop_id).exec(&db_tx).await?;
            Ok::<(), EngineError>(())
        })?;
        self.drop_shop_lock(shop_id);
        Ok(())
    }
}
