//! Supply-side purchase primitives.
//!
//! Purchases from the distributor are append-only: supplier exposure is a
//! running total over all entries, not a per-row ledger, so there is no
//! amend/delete path and no recompute.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyPaise, ResultEngine};

/// A persisted purchase entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purchase {
    pub purchase_id: i64,
    pub purchase_date: NaiveDate,
    pub cylinders_purchased: i32,
    pub empty_cylinders_returned: i32,
    pub price_per_cylinder: MoneyPaise,
    pub total_amount: MoneyPaise,
    pub payment_cash: MoneyPaise,
    pub payment_upi: MoneyPaise,
    /// total − cash − upi for this entry alone.
    pub outstanding: MoneyPaise,
}

/// Input for recording a purchase.
#[derive(Clone, Debug)]
pub struct NewPurchase {
    pub purchase_date: NaiveDate,
    pub cylinders_purchased: i32,
    pub empty_cylinders_returned: i32,
    pub price_per_cylinder: MoneyPaise,
    pub payment_cash: MoneyPaise,
    pub payment_upi: MoneyPaise,
}

impl NewPurchase {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if self.cylinders_purchased < 0 {
            return Err(EngineError::InvalidEntry(
                "cylinders_purchased must not be negative".to_string(),
            ));
        }
        if self.empty_cylinders_returned < 0 {
            return Err(EngineError::InvalidEntry(
                "empty_cylinders_returned must not be negative".to_string(),
            ));
        }
        for (value, field) in [
            (self.price_per_cylinder, "price_per_cylinder"),
            (self.payment_cash, "payment_cash"),
            (self.payment_upi, "payment_upi"),
        ] {
            if value.is_negative() {
                return Err(EngineError::InvalidEntry(format!(
                    "{field} must not be negative"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn total_amount(&self) -> MoneyPaise {
        MoneyPaise::new(i64::from(self.cylinders_purchased) * self.price_per_cylinder.paise())
    }

    pub(crate) fn outstanding(&self) -> MoneyPaise {
        self.total_amount() - self.payment_cash - self.payment_upi
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cylinder_purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub purchase_id: i64,
    pub purchase_date: Date,
    pub cylinders_purchased: i32,
    pub empty_cylinders_returned: i32,
    pub price_per_cylinder_paise: i64,
    pub total_amount_paise: i64,
    pub payment_cash_paise: i64,
    pub payment_upi_paise: i64,
    pub outstanding_paise: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Purchase {
    fn from(model: Model) -> Self {
        Self {
            purchase_id: model.purchase_id,
            purchase_date: model.purchase_date,
            cylinders_purchased: model.cylinders_purchased,
            empty_cylinders_returned: model.empty_cylinders_returned,
            price_per_cylinder: MoneyPaise::new(model.price_per_cylinder_paise),
            total_amount: MoneyPaise::new(model.total_amount_paise),
            payment_cash: MoneyPaise::new(model.payment_cash_paise),
            payment_upi: MoneyPaise::new(model.payment_upi_paise),
            outstanding: MoneyPaise::new(model.outstanding_paise),
        }
    }
}

impl From<&NewPurchase> for ActiveModel {
    fn from(new: &NewPurchase) -> Self {
        Self {
            purchase_id: ActiveValue::NotSet,
            purchase_date: ActiveValue::Set(new.purchase_date),
            cylinders_purchased: ActiveValue::Set(new.cylinders_purchased),
            empty_cylinders_returned: ActiveValue::Set(new.empty_cylinders_returned),
            price_per_cylinder_paise: ActiveValue::Set(new.price_per_cylinder.paise()),
            total_amount_paise: ActiveValue::Set(new.total_amount().paise()),
            payment_cash_paise: ActiveValue::Set(new.payment_cash.paise()),
            payment_upi_paise: ActiveValue::Set(new.payment_upi.paise()),
            outstanding_paise: ActiveValue::Set(new.outstanding().paise()),
        }
    }
}
