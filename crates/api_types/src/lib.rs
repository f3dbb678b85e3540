use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod shop {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShopNew {
        pub shop_name: String,
        pub mobile_number: String,
        pub address: String,
    }

    /// Partial update; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ShopUpdate {
        pub shop_name: Option<String>,
        pub mobile_number: Option<String>,
        pub address: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShopView {
        pub shop_id: i64,
        pub shop_name: String,
        pub mobile_number: String,
        pub address: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShopListResponse {
        pub shops: Vec<ShopView>,
    }
}

pub mod delivery {
    use super::*;

    /// All monetary fields are integer paise.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliveryNew {
        pub shop_id: i64,
        pub transaction_date: NaiveDate,
        pub cylinders_delivered: i32,
        pub empty_cylinders_received: i32,
        pub price_per_cylinder_paise: i64,
        pub payment_cash_paise: i64,
        pub payment_upi_paise: i64,
    }

    /// Partial update; absent fields are left unchanged. The shop id is
    /// immutable and deliberately not present here.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DeliveryUpdate {
        pub transaction_date: Option<NaiveDate>,
        pub cylinders_delivered: Option<i32>,
        pub empty_cylinders_received: Option<i32>,
        pub price_per_cylinder_paise: Option<i64>,
        pub payment_cash_paise: Option<i64>,
        pub payment_upi_paise: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliveryView {
        pub transaction_id: i64,
        pub shop_id: i64,
        pub transaction_date: NaiveDate,
        pub cylinders_delivered: i32,
        pub empty_cylinders_received: i32,
        pub price_per_cylinder_paise: i64,
        pub total_amount_paise: i64,
        pub payment_cash_paise: i64,
        pub payment_upi_paise: i64,
        /// Engine-owned running balance after this row, in ledger order.
        pub balance_after_paise: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliveryListResponse {
        pub deliveries: Vec<DeliveryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub shop_id: i64,
        pub balance_paise: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecomputeResponse {
        pub shop_id: i64,
        /// Rows whose stored balance changed. Zero means the chain was
        /// already consistent.
        pub rows_changed: usize,
    }
}

pub mod purchase {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseNew {
        pub purchase_date: NaiveDate,
        pub cylinders_purchased: i32,
        pub empty_cylinders_returned: i32,
        pub price_per_cylinder_paise: i64,
        pub payment_cash_paise: i64,
        pub payment_upi_paise: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseView {
        pub purchase_id: i64,
        pub purchase_date: NaiveDate,
        pub cylinders_purchased: i32,
        pub empty_cylinders_returned: i32,
        pub price_per_cylinder_paise: i64,
        pub total_amount_paise: i64,
        pub payment_cash_paise: i64,
        pub payment_upi_paise: i64,
        pub outstanding_paise: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct PurchaseListQuery {
        pub from: NaiveDate,
        pub to: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseListResponse {
        pub purchases: Vec<PurchaseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseTotalsResponse {
        pub cylinders_purchased: i64,
        pub empty_cylinders_returned: i64,
        pub pending_return: i64,
        pub outstanding_paise: i64,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub expense_date: NaiveDate,
        pub expense_type: String,
        pub amount_paise: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub expense_id: i64,
        pub expense_date: NaiveDate,
        pub expense_type: String,
        pub amount_paise: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ExpenseReportQuery {
        pub from: NaiveDate,
        pub to: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseReportResponse {
        pub expenses: Vec<ExpenseView>,
        pub total_paise: i64,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct DeliveryReportQuery {
        pub shop_id: Option<i64>,
        pub from: NaiveDate,
        pub to: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliveryReportResponse {
        pub cylinders_delivered: i64,
        pub empty_cylinders_received: i64,
        pub pending_return: i64,
        pub total_amount_paise: i64,
        pub payment_cash_paise: i64,
        pub payment_upi_paise: i64,
        /// Closing balance of the window, summed per shop.
        pub balance_paise: i64,
    }
}
