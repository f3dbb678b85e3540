//! Shop primitives.
//!
//! A `Shop` is a customer whose deliveries form one ledger.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, ResultEngine};

/// A shop/customer record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shop {
    pub shop_id: i64,
    pub shop_name: String,
    pub mobile_number: String,
    pub address: String,
}

/// Input for creating a shop.
#[derive(Clone, Debug)]
pub struct NewShop {
    pub shop_name: String,
    pub mobile_number: String,
    pub address: String,
}

impl NewShop {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        validate_shop_name(&self.shop_name)?;
        validate_mobile_number(&self.mobile_number)
    }
}

/// Partial update for a shop. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct ShopPatch {
    pub shop_name: Option<String>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
}

impl ShopPatch {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let Some(name) = &self.shop_name {
            validate_shop_name(name)?;
        }
        if let Some(mobile) = &self.mobile_number {
            validate_mobile_number(mobile)?;
        }
        Ok(())
    }
}

fn validate_shop_name(name: &str) -> ResultEngine<()> {
    if name.trim().is_empty() {
        return Err(EngineError::InvalidEntry(
            "shop name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_mobile_number(mobile: &str) -> ResultEngine<()> {
    if mobile.is_empty() || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::InvalidEntry(
            "mobile number must contain digits only".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub shop_id: i64,
    pub shop_name: String,
    pub mobile_number: String,
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deliveries::Entity")]
    Deliveries,
}

impl Related<super::deliveries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliveries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Shop {
    fn from(model: Model) -> Self {
        Self {
            shop_id: model.shop_id,
            shop_name: model.shop_name,
            mobile_number: model.mobile_number,
            address: model.address,
        }
    }
}

impl From<&NewShop> for ActiveModel {
    fn from(new: &NewShop) -> Self {
        Self {
            shop_id: ActiveValue::NotSet,
            shop_name: ActiveValue::Set(new.shop_name.trim().to_string()),
            mobile_number: ActiveValue::Set(new.mobile_number.clone()),
            address: ActiveValue::Set(new.address.clone()),
        }
    }
}
