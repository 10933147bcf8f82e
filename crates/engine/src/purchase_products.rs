use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PurchaseProduct {
    pub product_id: i32,
    pub qtt: i32,
    pub qtt_unite: i32,
    pub price: Money,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub purchase_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i32,
    pub qtt: i32,
    pub qtt_unite: i32,
    pub price: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchases::Entity",
        from = "Column::PurchaseId",
        to = "super::purchases::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Purchases,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PurchaseProduct {
    fn from(model: Model) -> Self {
        Self {
            product_id: model.product_id,
            qtt: model.qtt,
            qtt_unite: model.qtt_unite,
            price: Money::new(model.price),
        }
    }
}
