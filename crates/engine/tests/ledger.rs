use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{DeliveryPatch, Engine, EngineError, MoneyPaise, NewDelivery, NewShop};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    (engine, db, path)
}

async fn shop(engine: &Engine, name: &str) -> i64 {
    engine
        .create_shop(NewShop {
            shop_name: name.to_string(),
            mobile_number: "9876543210".to_string(),
            address: "Main Road".to_string(),
        })
        .await
        .unwrap()
        .shop_id
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn delivery(
    shop_id: i64,
    day: u32,
    cylinders: i32,
    price_paise: i64,
    cash_paise: i64,
    upi_paise: i64,
) -> NewDelivery {
    NewDelivery {
        shop_id,
        transaction_date: date(day),
        cylinders_delivered: cylinders,
        empty_cylinders_received: 0,
        price_per_cylinder: MoneyPaise::new(price_paise),
        payment_cash: MoneyPaise::new(cash_paise),
        payment_upi: MoneyPaise::new(upi_paise),
    }
}

/// Walks the ledger and checks each stored balance against the running fold.
async fn assert_chain_consistent(engine: &Engine, shop_id: i64) {
    let rows = engine.list_deliveries(shop_id).await.unwrap();
    let mut running = MoneyPaise::ZERO;
    for row in &rows {
        running += row.net_amount();
        assert_eq!(
            row.balance_after, running,
            "balance chain broken at transaction {}",
            row.transaction_id
        );
    }
}

#[tokio::test]
async fn appended_deliveries_accumulate_balances() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    // 2 cylinders at Rs. 900, Rs. 1000 cash: net +80000 paise.
    let first = engine
        .record_delivery(delivery(shop_id, 1, 2, 90_000, 100_000, 0))
        .await
        .unwrap();
    assert_eq!(first.total_amount, MoneyPaise::new(180_000));
    assert_eq!(first.balance_after, MoneyPaise::new(80_000));

    // 1 cylinder, fully unpaid: net +90000.
    let second = engine
        .record_delivery(delivery(shop_id, 2, 1, 90_000, 0, 0))
        .await
        .unwrap();
    assert_eq!(second.balance_after, MoneyPaise::new(170_000));

    // Overpayment pulls the balance down below the previous row.
    let third = engine
        .record_delivery(delivery(shop_id, 3, 1, 90_000, 150_000, 50_000))
        .await
        .unwrap();
    assert_eq!(third.balance_after, MoneyPaise::new(60_000));

    assert_eq!(
        engine.current_balance(shop_id).await.unwrap(),
        MoneyPaise::new(60_000)
    );
    assert_chain_consistent(&engine, shop_id).await;
}

#[tokio::test]
async fn backdated_delivery_reorders_and_shifts_the_chain() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    engine
        .record_delivery(delivery(shop_id, 5, 1, 90_000, 0, 0))
        .await
        .unwrap();
    engine
        .record_delivery(delivery(shop_id, 10, 1, 90_000, 0, 0))
        .await
        .unwrap();

    // Lands between the existing rows in date order.
    let backdated = engine
        .record_delivery(delivery(shop_id, 7, 2, 90_000, 100_000, 0))
        .await
        .unwrap();

    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].transaction_id, backdated.transaction_id);
    assert_eq!(rows[0].balance_after, MoneyPaise::new(90_000));
    assert_eq!(rows[1].balance_after, MoneyPaise::new(170_000));
    assert_eq!(rows[2].balance_after, MoneyPaise::new(260_000));
}

#[tokio::test]
async fn same_date_deliveries_order_by_creation() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    let first = engine
        .record_delivery(delivery(shop_id, 1, 1, 90_000, 0, 0))
        .await
        .unwrap();
    let second = engine
        .record_delivery(delivery(shop_id, 1, 1, 80_000, 0, 0))
        .await
        .unwrap();

    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows[0].transaction_id, first.transaction_id);
    assert_eq!(rows[1].transaction_id, second.transaction_id);
    assert_eq!(rows[1].balance_after, MoneyPaise::new(170_000));
}

#[tokio::test]
async fn amending_amounts_rewrites_the_suffix() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    let first = engine
        .record_delivery(delivery(shop_id, 1, 1, 90_000, 0, 0))
        .await
        .unwrap();
    engine
        .record_delivery(delivery(shop_id, 2, 1, 90_000, 0, 0))
        .await
        .unwrap();

    // Doubling the quantity re-derives the total and shifts every later row.
    let updated = engine
        .update_delivery(
            first.transaction_id,
            DeliveryPatch {
                cylinders_delivered: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total_amount, MoneyPaise::new(180_000));
    assert_eq!(updated.balance_after, MoneyPaise::new(180_000));

    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows[1].balance_after, MoneyPaise::new(270_000));
    assert_chain_consistent(&engine, shop_id).await;
}

#[tokio::test]
async fn amending_the_date_moves_the_row_in_the_ledger() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    let first = engine
        .record_delivery(delivery(shop_id, 1, 1, 90_000, 0, 0))
        .await
        .unwrap();
    engine
        .record_delivery(delivery(shop_id, 5, 2, 80_000, 0, 0))
        .await
        .unwrap();

    engine
        .update_delivery(
            first.transaction_id,
            DeliveryPatch {
                transaction_date: Some(date(9)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows[1].transaction_id, first.transaction_id);
    assert_eq!(rows[0].balance_after, MoneyPaise::new(160_000));
    assert_eq!(rows[1].balance_after, MoneyPaise::new(250_000));
}

#[tokio::test]
async fn deleting_a_delivery_shifts_later_balances() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    engine
        .record_delivery(delivery(shop_id, 1, 1, 90_000, 0, 0))
        .await
        .unwrap();
    let middle = engine
        .record_delivery(delivery(shop_id, 2, 2, 90_000, 100_000, 0))
        .await
        .unwrap();
    engine
        .record_delivery(delivery(shop_id, 3, 1, 90_000, 0, 0))
        .await
        .unwrap();

    engine.delete_delivery(middle.transaction_id).await.unwrap();

    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].balance_after, MoneyPaise::new(90_000));
    assert_eq!(rows[1].balance_after, MoneyPaise::new(180_000));
    assert_chain_consistent(&engine, shop_id).await;
}

#[tokio::test]
async fn partial_payments_settle_and_backdate_as_one_chain() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    // Day 1: 10 cylinders at Rs. 50, Rs. 300 cash. Day 2: 5 more, Rs. 250.
    let first = engine
        .record_delivery(delivery(shop_id, 1, 10, 5_000, 30_000, 0))
        .await
        .unwrap();
    let second = engine
        .record_delivery(delivery(shop_id, 2, 5, 5_000, 25_000, 0))
        .await
        .unwrap();
    assert_eq!(first.balance_after, MoneyPaise::new(20_000));
    assert_eq!(second.balance_after, MoneyPaise::new(20_000));

    // Settling day 1 in full zeroes the whole chain.
    engine
        .update_delivery(
            first.transaction_id,
            DeliveryPatch {
                payment_cash: Some(MoneyPaise::new(50_000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows[0].balance_after, MoneyPaise::ZERO);
    assert_eq!(rows[1].balance_after, MoneyPaise::ZERO);

    // A forgotten unpaid delivery from before day 1 lifts every row.
    engine
        .record_delivery(NewDelivery {
            shop_id,
            transaction_date: NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(),
            cylinders_delivered: 2,
            empty_cylinders_received: 0,
            price_per_cylinder: MoneyPaise::new(5_000),
            payment_cash: MoneyPaise::ZERO,
            payment_upi: MoneyPaise::ZERO,
        })
        .await
        .unwrap();
    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.balance_after, MoneyPaise::new(10_000));
    }
}

#[tokio::test]
async fn recompute_without_mutations_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    engine
        .record_delivery(delivery(shop_id, 1, 1, 90_000, 0, 0))
        .await
        .unwrap();
    engine
        .record_delivery(delivery(shop_id, 2, 1, 90_000, 40_000, 0))
        .await
        .unwrap();

    let changed = engine.recompute_shop_balances(shop_id).await.unwrap();
    assert_eq!(changed, 0);
}

#[tokio::test]
async fn balance_of_empty_shop_is_zero() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    assert_eq!(
        engine.current_balance(shop_id).await.unwrap(),
        MoneyPaise::ZERO
    );
    assert!(engine.list_deliveries(shop_id).await.unwrap().is_empty());
    assert_eq!(engine.recompute_shop_balances(shop_id).await.unwrap(), 0);
}

#[tokio::test]
async fn operations_on_unknown_shop_fail() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.current_balance(404).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("shop not exists".to_string()));

    let err = engine
        .record_delivery(delivery(404, 1, 1, 90_000, 0, 0))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("shop not exists".to_string()));
}

#[tokio::test]
async fn unknown_delivery_update_and_delete_fail() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .update_delivery(
            404,
            DeliveryPatch {
                payment_cash: Some(MoneyPaise::new(100)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("delivery not exists".to_string())
    );

    let err = engine.delete_delivery(404).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("delivery not exists".to_string())
    );
}

#[tokio::test]
async fn rejects_invalid_delivery_input() {
    let (engine, _db) = engine_with_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    let err = engine
        .record_delivery(delivery(shop_id, 1, -1, 90_000, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidEntry(_)));

    let err = engine
        .record_delivery(delivery(shop_id, 1, 1, -90_000, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidEntry(_)));

    let first = engine
        .record_delivery(delivery(shop_id, 1, 1, 90_000, 0, 0))
        .await
        .unwrap();
    let err = engine
        .update_delivery(first.transaction_id, DeliveryPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidEntry(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_amend_and_delete_serialize() {
    let (engine, db, path) = engine_with_file_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    let first = engine
        .record_delivery(delivery(shop_id, 1, 1, 90_000, 0, 0))
        .await
        .unwrap();
    let second = engine
        .record_delivery(delivery(shop_id, 2, 1, 90_000, 0, 0))
        .await
        .unwrap();
    engine
        .record_delivery(delivery(shop_id, 3, 1, 90_000, 0, 0))
        .await
        .unwrap();

    let engine = std::sync::Arc::new(engine);
    let update = {
        let engine = std::sync::Arc::clone(&engine);
        tokio::spawn(async move {
            engine
                .update_delivery(
                    first.transaction_id,
                    DeliveryPatch {
                        payment_cash: Some(MoneyPaise::new(90_000)),
                        ..Default::default()
                    },
                )
                .await
        })
    };
    let delete = {
        let engine = std::sync::Arc::clone(&engine);
        tokio::spawn(async move { engine.delete_delivery(second.transaction_id).await })
    };
    update.await.unwrap().unwrap();
    delete.await.unwrap().unwrap();

    // Whichever won the lock first, the surviving rows form one chain.
    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        engine.current_balance(shop_id).await.unwrap(),
        MoneyPaise::new(90_000)
    );
    assert_chain_consistent(&engine, shop_id).await;

    drop(engine);
    db.close().await.unwrap();
    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_writers_leave_a_consistent_chain() {
    let (engine, db, path) = engine_with_file_db().await;
    let shop_id = shop(&engine, "Ganesh Stores").await;

    let engine = std::sync::Arc::new(engine);
    let mut handles = Vec::new();
    for day in 1..=8u32 {
        let engine = std::sync::Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .record_delivery(delivery(shop_id, day, 1, 90_000, 30_000, 0))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let rows = engine.list_deliveries(shop_id).await.unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(
        engine.current_balance(shop_id).await.unwrap(),
        MoneyPaise::new(8 * 60_000)
    );
    assert_chain_consistent(&engine, shop_id).await;

    drop(engine);
    db.close().await.unwrap();
    let _ = std::fs::remove_file(path);
}
