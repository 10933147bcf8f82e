//! The module contains `Purchase`, one delivery from a supplier.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::{
    Money, purchase_boxes::PurchaseBox, purchase_products::PurchaseProduct,
    purchase_wastes::PurchaseWaste,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Purchase {
    pub id: i32,
    pub supplier_id: i32,
    pub date: NaiveDate,
    /// Σ price × units over the product lines.
    pub total: Money,
}

/// A purchase together with its line items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PurchaseDetail {
    pub purchase: Purchase,
    pub products: Vec<PurchaseProduct>,
    pub boxes: Vec<PurchaseBox>,
    pub wastes: Vec<PurchaseWaste>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub supplier_id: i32,
    pub date: Date,
    pub total: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Suppliers,
    #[sea_orm(has_many = "super::purchase_products::Entity")]
    PurchaseProducts,
    #[sea_orm(has_many = "super::purchase_boxes::Entity")]
    PurchaseBoxes,
    #[sea_orm(has_many = "super::purchase_wastes::Entity")]
    PurchaseWastes,
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::purchase_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseProducts.def()
    }
}

impl Related<super::purchase_boxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseBoxes.def()
    }
}

impl Related<super::purchase_wastes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseWastes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Purchase {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            supplier_id: model.supplier_id,
            date: model.date,
            total: Money::new(model.total),
        }
    }
}
