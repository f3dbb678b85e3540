use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, PoisonError},
    time::Duration,
};

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::{EngineError, ResultEngine};

mod deliveries;
mod expenses;
mod purchases;
mod reports;
mod shops;

pub use expenses::ExpenseReport;
pub use reports::{DeliveryTotals, PurchaseTotals};

/// How long a mutation waits for a shop's ledger lock before giving up with
/// [`EngineError::LedgerBusy`].
pub(crate) const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounded retries for transient store errors during a ledger write.
pub(crate) const STORE_RETRIES: u32 = 3;
pub(crate) const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// Like `with_tx!`, but retries the whole transaction on transient connection
/// errors. The roll-back-and-rerun keeps the fold a function of a single
/// snapshot: a retry re-reads everything instead of resuming a previous fold.
///
/// Callers must hold the shop's ledger lock across all attempts.
macro_rules! with_store_retry {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let mut attempt: u32 = 0;
        loop {
            let result = async { $crate::ops::with_tx!($self, |$tx| $body) }.await;
            match result {
                Err($crate::EngineError::Database(err))
                    if $crate::ops::is_transient(&err) && attempt < $crate::ops::STORE_RETRIES =>
                {
                    attempt += 1;
                    tracing::warn!(attempt, "transient store error, retrying ledger write: {err}");
                    tokio::time::sleep($crate::ops::RETRY_BACKOFF).await;
                }
                other => break other,
            }
        }
    }};
}

pub(crate) use with_store_retry;
pub(crate) use with_tx;

pub(crate) fn is_transient(err: &sea_orm::DbErr) -> bool {
    matches!(
        err,
        sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_)
    )
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// One async mutex per shop serializes the fetch→fold→persist cycle.
    /// Mutations on different shops proceed in parallel.
    shop_locks: StdMutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn shop_lock(&self, shop_id: i64) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .shop_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(shop_id).or_default())
    }

    /// Acquires the shop's ledger lock, bounded by [`LOCK_TIMEOUT`].
    pub(crate) async fn lock_shop(&self, shop_id: i64) -> ResultEngine<OwnedMutexGuard<()>> {
        let lock = self.shop_lock(shop_id);
        tokio::time::timeout(LOCK_TIMEOUT, lock.lock_owned())
            .await
            .map_err(|_| EngineError::LedgerBusy(format!("shop {shop_id}")))
    }

    /// Forgets a deleted shop's lock entry so the map only tracks live shops.
    pub(crate) fn drop_shop_lock(&self, shop_id: i64) {
        let mut locks = self
            .shop_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.remove(&shop_id);
    }

    pub(crate) async fn require_shop<C>(
        &self,
        db: &C,
        shop_id: i64,
    ) -> ResultEngine<crate::shops::Model>
    where
        C: ConnectionTrait,
    {
        crate::shops::Entity::find_by_id(shop_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("shop not exists".to_string()))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            shop_locks: StdMutex::new(HashMap::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use crate::NewShop;

    use super::Engine;

    async fn engine_with_db() -> Engine {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    fn holds_lock_entry(engine: &Engine, shop_id: i64) -> bool {
        engine.shop_locks.lock().unwrap().contains_key(&shop_id)
    }

    #[tokio::test]
    async fn deleting_a_shop_forgets_its_lock_entry() {
        let engine = engine_with_db().await;
        let shop = engine
            .create_shop(NewShop {
                shop_name: "Om Traders".to_string(),
                mobile_number: "9876543210".to_string(),
                address: "Main Road".to_string(),
            })
            .await
            .unwrap();

        drop(engine.lock_shop(shop.shop_id).await.unwrap());
        assert!(holds_lock_entry(&engine, shop.shop_id));

        engine.delete_shop(shop.shop_id).await.unwrap();
        assert!(!holds_lock_entry(&engine, shop.shop_id));
    }
}
