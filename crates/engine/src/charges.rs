//! Ad hoc expenses (fuel, tolls, repairs).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "charges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String,
    pub amount: i64,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trip_charges::Entity")]
    TripCharges,
}

impl Related<super::trip_charges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripCharges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
