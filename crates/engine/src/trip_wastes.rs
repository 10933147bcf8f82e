use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

/// Waste declared when a trip is closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TripWaste {
    pub trip_id: i32,
    pub product_id: i32,
    pub kind: String,
    pub qtt: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trip_wastes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub trip_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
    pub qtt: i32,
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
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TripWaste {
    fn from(model: Model) -> Self {
        Self {
            trip_id: model.trip_id,
            product_id: model.product_id,
            kind: model.kind,
            qtt: model.qtt,
        }
    }
}

impl From<&TripWaste> for ActiveModel {
    fn from(value: &TripWaste) -> Self {
        Self {
            trip_id: ActiveValue::Set(value.trip_id),
            product_id: ActiveValue::Set(value.product_id),
            kind: ActiveValue::Set(value.kind.clone()),
            qtt: ActiveValue::Set(value.qtt),
        }
    }
}
