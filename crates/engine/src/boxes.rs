//! Returnable container types and their warehouse counters.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

/// A returnable box type.
///
/// The three counters track where the physical boxes are:
///
/// - `in_stock`: full or clean boxes ready to be loaded
/// - `empty`: boxes that came back from a trip
/// - `sent`: boxes currently out on a truck
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReturnableBox {
    pub id: i32,
    pub designation: String,
    pub kind: String,
    pub in_stock: i32,
    pub empty: i32,
    pub sent: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "boxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub designation: String,
    pub kind: String,
    pub in_stock: i32,
    pub empty: i32,
    pub sent: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ReturnableBox {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            designation: model.designation,
            kind: model.kind,
            in_stock: model.in_stock,
            empty: model.empty,
            sent: model.sent,
        }
    }
}

impl From<&ReturnableBox> for ActiveModel {
    fn from(value: &ReturnableBox) -> Self {
        Self {
            id: ActiveValue::NotSet,
            designation: ActiveValue::Set(value.designation.clone()),
            kind: ActiveValue::Set(value.kind.clone()),
            in_stock: ActiveValue::Set(value.in_stock),
            empty: ActiveValue::Set(value.empty),
            sent: ActiveValue::Set(value.sent),
        }
    }
}
