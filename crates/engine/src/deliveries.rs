//! Delivery primitives.
//!
//! A `Delivery` is one day's cylinder delivery for a shop. Its
//! `balance_after` field is owned by the recomputation engine and is the only
//! derived, mutable field of the row.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyPaise, ResultEngine};

/// A persisted delivery, including its recomputed running balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub transaction_id: i64,
    pub shop_id: i64,
    pub transaction_date: NaiveDate,
    pub cylinders_delivered: i32,
    pub empty_cylinders_received: i32,
    pub price_per_cylinder: MoneyPaise,
    pub total_amount: MoneyPaise,
    pub payment_cash: MoneyPaise,
    pub payment_upi: MoneyPaise,
    /// Cumulative (total − cash − upi) up to and including this row, in
    /// ledger order.
    pub balance_after: MoneyPaise,
}

impl Delivery {
    /// Gross minus payments for this row alone.
    #[must_use]
    pub fn net_amount(&self) -> MoneyPaise {
        self.total_amount - self.payment_cash - self.payment_upi
    }
}

/// Input for recording a delivery. The id and creation sequence are assigned
/// by the store; the balance is derived by the engine.
#[derive(Clone, Debug)]
pub struct NewDelivery {
    pub shop_id: i64,
    pub transaction_date: NaiveDate,
    pub cylinders_delivered: i32,
    pub empty_cylinders_received: i32,
    pub price_per_cylinder: MoneyPaise,
    pub payment_cash: MoneyPaise,
    pub payment_upi: MoneyPaise,
}

impl NewDelivery {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        validate_quantity(self.cylinders_delivered, "cylinders_delivered")?;
        validate_quantity(self.empty_cylinders_received, "empty_cylinders_received")?;
        validate_amount(self.price_per_cylinder, "price_per_cylinder")?;
        validate_amount(self.payment_cash, "payment_cash")?;
        validate_amount(self.payment_upi, "payment_upi")
    }

    pub(crate) fn total_amount(&self) -> MoneyPaise {
        total_amount(self.cylinders_delivered, self.price_per_cylinder)
    }
}

/// Partial update for a delivery. `None` fields are left unchanged.
///
/// The shop id and the creation sequence are deliberately not representable
/// here: both are immutable once assigned. Changing the date is allowed and
/// may reorder the ledger; the recompute handles it.
#[derive(Clone, Debug, Default)]
pub struct DeliveryPatch {
    pub transaction_date: Option<NaiveDate>,
    pub cylinders_delivered: Option<i32>,
    pub empty_cylinders_received: Option<i32>,
    pub price_per_cylinder: Option<MoneyPaise>,
    pub payment_cash: Option<MoneyPaise>,
    pub payment_upi: Option<MoneyPaise>,
}

impl DeliveryPatch {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let Some(delivered) = self.cylinders_delivered {
            validate_quantity(delivered, "cylinders_delivered")?;
        }
        if let Some(received) = self.empty_cylinders_received {
            validate_quantity(received, "empty_cylinders_received")?;
        }
        if let Some(price) = self.price_per_cylinder {
            validate_amount(price, "price_per_cylinder")?;
        }
        if let Some(cash) = self.payment_cash {
            validate_amount(cash, "payment_cash")?;
        }
        if let Some(upi) = self.payment_upi {
            validate_amount(upi, "payment_upi")?;
        }
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transaction_date.is_none()
            && self.cylinders_delivered.is_none()
            && self.empty_cylinders_received.is_none()
            && self.price_per_cylinder.is_none()
            && self.payment_cash.is_none()
            && self.payment_upi.is_none()
    }
}

pub(crate) fn total_amount(cylinders_delivered: i32, price: MoneyPaise) -> MoneyPaise {
    MoneyPaise::new(i64::from(cylinders_delivered) * price.paise())
}

fn validate_quantity(value: i32, field: &str) -> ResultEngine<()> {
    if value < 0 {
        return Err(EngineError::InvalidEntry(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

fn validate_amount(value: MoneyPaise, field: &str) -> ResultEngine<()> {
    if value.is_negative() {
        return Err(EngineError::InvalidEntry(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_transactions")]
pub struct Model {
    /// Also the creation sequence: the store assigns ids monotonically per
    /// insert, and ledger ordering ties break on it.
    #[sea_orm(primary_key)]
    pub transaction_id: i64,
    pub shop_id: i64,
    pub transaction_date: Date,
    pub cylinders_delivered: i32,
    pub empty_cylinders_received: i32,
    pub price_per_cylinder_paise: i64,
    pub total_amount_paise: i64,
    pub payment_cash_paise: i64,
    pub payment_upi_paise: i64,
    pub balance_after_paise: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shops::Entity",
        from = "Column::ShopId",
        to = "super::shops::Column::ShopId"
    )]
    Shops,
}

impl Related<super::shops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Delivery {
    fn from(model: Model) -> Self {
        Self {
            transaction_id: model.transaction_id,
            shop_id: model.shop_id,
            transaction_date: model.transaction_date,
            cylinders_delivered: model.cylinders_delivered,
            empty_cylinders_received: model.empty_cylinders_received,
            price_per_cylinder: MoneyPaise::new(model.price_per_cylinder_paise),
            total_amount: MoneyPaise::new(model.total_amount_paise),
            payment_cash: MoneyPaise::new(model.payment_cash_paise),
            payment_upi: MoneyPaise::new(model.payment_upi_paise),
            balance_after: MoneyPaise::new(model.balance_after_paise),
        }
    }
}

impl From<&NewDelivery> for ActiveModel {
    fn from(new: &NewDelivery) -> Self {
        Self {
            transaction_id: ActiveValue::NotSet,
            shop_id: ActiveValue::Set(new.shop_id),
            transaction_date: ActiveValue::Set(new.transaction_date),
            cylinders_delivered: ActiveValue::Set(new.cylinders_delivered),
            empty_cylinders_received: ActiveValue::Set(new.empty_cylinders_received),
            price_per_cylinder_paise: ActiveValue::Set(new.price_per_cylinder.paise()),
            total_amount_paise: ActiveValue::Set(new.total_amount().paise()),
            payment_cash_paise: ActiveValue::Set(new.payment_cash.paise()),
            payment_upi_paise: ActiveValue::Set(new.payment_upi.paise()),
            // Placeholder until the recompute runs in the same transaction.
            balance_after_paise: ActiveValue::Set(0),
        }
    }
}
