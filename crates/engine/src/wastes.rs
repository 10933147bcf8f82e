//! Running waste balances keyed by product and waste kind.
//!
//! Rows are created lazily the first time a `(product, kind)` pair is
//! referenced. Trip closes add to the balance, supplier purchases take from
//! it.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Waste {
    pub product_id: i32,
    pub kind: String,
    pub qtt: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wastes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
    pub qtt: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Waste {
    fn from(model: Model) -> Self {
        Self {
            product_id: model.product_id,
            kind: model.kind,
            qtt: model.qtt,
        }
    }
}
