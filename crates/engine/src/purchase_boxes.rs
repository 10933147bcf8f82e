use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Boxes received from (`qtt_in`) and handed back to (`qtt_out`) a supplier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PurchaseBox {
    pub id: i32,
    pub box_id: i32,
    pub qtt_in: i32,
    pub qtt_out: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_boxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub purchase_id: i32,
    pub box_id: i32,
    pub qtt_in: i32,
    pub qtt_out: i32,
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

impl From<Model> for PurchaseBox {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            box_id: model.box_id,
            qtt_in: model.qtt_in,
            qtt_out: model.qtt_out,
        }
    }
}
