use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::{Money, charges};

/// A charge attributed to a trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TripCharge {
    pub charge_id: i32,
    pub kind: String,
    pub amount: Money,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trip_charges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub trip_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub charge_id: i32,
    pub amount: i64,
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
        belongs_to = "super::charges::Entity",
        from = "Column::ChargeId",
        to = "super::charges::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Charges,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::charges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<(Model, charges::Model)> for TripCharge {
    fn from((link, charge): (Model, charges::Model)) -> Self {
        Self {
            charge_id: link.charge_id,
            kind: charge.kind,
            amount: Money::new(link.amount),
            date: charge.date,
        }
    }
}
