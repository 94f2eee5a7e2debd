//! The module contains the `Item` struct and its entity.
//!
//! An item is a piece of fishing gear an owner puts up for rent: a rod, a
//! reel, an echo sounder. The owner reference is immutable after creation
//! for booking purposes.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Currency, EngineError};

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// Stable identifier, a UUID generated once and persisted so the item
    /// can be renamed without breaking references.
    pub id: Uuid,
    pub name: String,
    /// Username of the owner.
    pub owner_id: String,
    /// Price for one rental day, in minor currency units.
    pub daily_rate_minor: i64,
    pub currency: Currency,
    /// The owner's global availability switch, independent of bookings. An
    /// unlisted item takes no new requests even on free dates.
    pub listed: bool,
}

impl Item {
    pub fn new(name: String, owner_id: String, daily_rate_minor: i64, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owner_id,
            daily_rate_minor,
            currency,
            listed: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub daily_rate_minor: i64,
    pub currency: String,
    pub listed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Owner,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Item> for ActiveModel {
    fn from(item: &Item) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            name: ActiveValue::Set(item.name.clone()),
            owner_id: ActiveValue::Set(item.owner_id.clone()),
            daily_rate_minor: ActiveValue::Set(item.daily_rate_minor),
            currency: ActiveValue::Set(item.currency.code().to_string()),
            listed: ActiveValue::Set(item.listed),
        }
    }
}

impl TryFrom<Model> for Item {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("item not exists".to_string()))?,
            name: model.name,
            owner_id: model.owner_id,
            daily_rate_minor: model.daily_rate_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            listed: model.listed,
        })
    }
}
