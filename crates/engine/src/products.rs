//! The module contains `Product` and its table.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

use crate::Money;

/// A product sold from the trucks.
///
/// Stock is kept in two counters: whole boxes (`stock`) and loose units
/// (`unite_in_stock`). `capacity_by_box` converts the former into the latter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: i32,
    pub designation: String,
    pub genre: String,
    /// Price of a single unit.
    pub price_unite: Money,
    pub capacity_by_box: i32,
    pub stock: i32,
    pub unite_in_stock: i32,
    /// Default container for this product.
    pub box_id: Option<i32>,
}

impl Product {
    /// Total loose units in `boxes` full boxes plus `loose` units.
    #[must_use]
    pub fn units(&self, boxes: i32, loose: i32) -> i64 {
        i64::from(self.capacity_by_box) * i64::from(boxes) + i64::from(loose)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub designation: String,
    pub genre: String,
    pub price_unite: i64,
    pub capacity_by_box: i32,
    pub stock: i32,
    pub unite_in_stock: i32,
    pub box_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::boxes::Entity",
        from = "Column::BoxId",
        to = "super::boxes::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Boxes,
    #[sea_orm(has_many = "super::wastes::Entity")]
    Wastes,
}

impl Related<super::boxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Boxes.def()
    }
}

impl Related<super::wastes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wastes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            designation: model.designation,
            genre: model.genre,
            price_unite: Money::new(model.price_unite),
            capacity_by_box: model.capacity_by_box,
            stock: model.stock,
            unite_in_stock: model.unite_in_stock,
            box_id: model.box_id,
        }
    }
}

impl From<&Product> for ActiveModel {
    fn from(value: &Product) -> Self {
        Self {
            id: ActiveValue::NotSet,
            designation: ActiveValue::Set(value.designation.clone()),
            genre: ActiveValue::Set(value.genre.clone()),
            price_unite: ActiveValue::Set(value.price_unite.cents()),
            capacity_by_box: ActiveValue::Set(value.capacity_by_box),
            stock: ActiveValue::Set(value.stock),
            unite_in_stock: ActiveValue::Set(value.unite_in_stock),
            box_id: ActiveValue::Set(value.box_id),
        }
    }
}
