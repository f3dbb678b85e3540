//! Initial schema migration - creates all tables from scratch.
//!
//! - `shops`: customer records, one ledger per shop
//! - `daily_transactions`: per-shop delivery ledger with the engine-owned
//!   `balance_after_paise` column
//! - `cylinder_purchases`: append-only supply-side entries
//! - `other_expenses`: append-only overhead entries

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Shops {
    Table,
    ShopId,
    ShopName,
    MobileNumber,
    Address,
}

#[derive(Iden)]
enum DailyTransactions {
    Table,
    TransactionId,
    ShopId,
    TransactionDate,
    CylindersDelivered,
    EmptyCylindersReceived,
    PricePerCylinderPaise,
    TotalAmountPaise,
    PaymentCashPaise,
    PaymentUpiPaise,
    BalanceAfterPaise,
}

#[derive(Iden)]
enum CylinderPurchases {
    Table,
    PurchaseId,
    PurchaseDate,
    CylindersPurchased,
    EmptyCylindersReturned,
    PricePerCylinderPaise,
    TotalAmountPaise,
    PaymentCashPaise,
    PaymentUpiPaise,
    OutstandingPaise,
}

#[derive(Iden)]
enum OtherExpenses {
    Table,
    ExpenseId,
    ExpenseDate,
    ExpenseType,
    AmountPaise,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Shops
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Shops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shops::ShopId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shops::ShopName).string().not_null())
                    .col(ColumnDef::new(Shops::MobileNumber).string().not_null())
                    .col(ColumnDef::new(Shops::Address).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-shops-shop_name-unique")
                    .table(Shops::Table)
                    .col(Shops::ShopName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Daily transactions (the per-shop ledger)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DailyTransactions::Table)
                    .if_not_exists()
                    .col(
                        // Auto-increment doubles as the creation sequence for
                        // same-date tie-breaks in ledger order.
                        ColumnDef::new(DailyTransactions::TransactionId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::ShopId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::CylindersDelivered)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::EmptyCylindersReceived)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::PricePerCylinderPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::TotalAmountPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::PaymentCashPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::PaymentUpiPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyTransactions::BalanceAfterPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-daily_transactions-shop_id")
                            .from(DailyTransactions::Table, DailyTransactions::ShopId)
                            .to(Shops::Table, Shops::ShopId),
                    )
                    .to_owned(),
            )
            .await?;

        // Covers the ledger-order scan the recompute runs on every mutation.
        manager
            .create_index(
                Index::create()
                    .name("idx-daily_transactions-ledger_order")
                    .table(DailyTransactions::Table)
                    .col(DailyTransactions::ShopId)
                    .col(DailyTransactions::TransactionDate)
                    .col(DailyTransactions::TransactionId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Cylinder purchases (supply side, append-only)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CylinderPurchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CylinderPurchases::PurchaseId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::PurchaseDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::CylindersPurchased)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::EmptyCylindersReturned)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::PricePerCylinderPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::TotalAmountPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::PaymentCashPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::PaymentUpiPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CylinderPurchases::OutstandingPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cylinder_purchases-purchase_date")
                    .table(CylinderPurchases::Table)
                    .col(CylinderPurchases::PurchaseDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Other expenses (overheads, append-only)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(OtherExpenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OtherExpenses::ExpenseId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OtherExpenses::ExpenseDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OtherExpenses::ExpenseType).string().not_null())
                    .col(
                        ColumnDef::new(OtherExpenses::AmountPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-other_expenses-expense_date")
                    .table(OtherExpenses::Table)
                    .col(OtherExpenses::ExpenseDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OtherExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CylinderPurchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shops::Table).to_owned())
            .await?;
        Ok(())
    }
}
