use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

/// Product loaded on a trip.
///
/// `qtt_*` fields count whole boxes, `*_unite` fields loose units. After
/// the close `qtt_reutour`/`qtt_reutour_unite` hold what is still on the
/// truck until the next trip picks it up or the truck is emptied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TripProduct {
    pub trip_id: i32,
    pub product_id: i32,
    pub qtt_out: i32,
    pub qtt_out_unite: i32,
    pub qtt_reutour: i32,
    pub qtt_reutour_unite: i32,
    pub qtt_vendu: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trip_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub trip_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i32,
    pub qtt_out: i32,
    pub qtt_out_unite: i32,
    pub qtt_reutour: i32,
    pub qtt_reutour_unite: i32,
    pub qtt_vendu: i32,
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
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TripProduct {
    fn from(model: Model) -> Self {
        Self {
            trip_id: model.trip_id,
            product_id: model.product_id,
            qtt_out: model.qtt_out,
            qtt_out_unite: model.qtt_out_unite,
            qtt_reutour: model.qtt_reutour,
            qtt_reutour_unite: model.qtt_reutour_unite,
            qtt_vendu: model.qtt_vendu,
        }
    }
}

impl From<&TripProduct> for ActiveModel {
    fn from(value: &TripProduct) -> Self {
        Self {
            trip_id: ActiveValue::Set(value.trip_id),
            product_id: ActiveValue::Set(value.product_id),
            qtt_out: ActiveValue::Set(value.qtt_out),
            qtt_out_unite: ActiveValue::Set(value.qtt_out_unite),
            qtt_reutour: ActiveValue::Set(value.qtt_reutour),
            qtt_reutour_unite: ActiveValue::Set(value.qtt_reutour_unite),
            qtt_vendu: ActiveValue::Set(value.qtt_vendu),
        }
    }
}
