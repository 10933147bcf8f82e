use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

/// Boxes loaded on a trip (`qtt_out`) and brought back (`qtt_in`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TripBox {
    pub trip_id: i32,
    pub box_id: i32,
    pub qtt_out: i32,
    pub qtt_in: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trip_boxes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub trip_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub box_id: i32,
    pub qtt_out: i32,
    pub qtt_in: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Trips,
    #[sea_orm(
        belongs_to = "super::boxes::Entity",
        from = "Column::BoxId",
        to = "super::boxes::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Boxes,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TripBox {
    fn from(model: Model) -> Self {
        Self {
            trip_id: model.trip_id,
            box_id: model.box_id,
            qtt_out: model.qtt_out,
            qtt_in: model.qtt_in,
        }
    }
}

impl From<&TripBox> for ActiveModel {
    fn from(value: &TripBox) -> Self {
        Self {
            trip_id: ActiveValue::Set(value.trip_id),
            box_id: ActiveValue::Set(value.box_id),
            qtt_out: ActiveValue::Set(value.qtt_out),
            qtt_in: ActiveValue::Set(value.qtt_in),
        }
    }
}
