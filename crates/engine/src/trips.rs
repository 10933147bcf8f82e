//! The module contains `Trip`, a single run of a truck, and its table.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

use crate::{
    Money, trip_boxes::TripBox, trip_charges::TripCharge, trip_products::TripProduct,
    trip_wastes::TripWaste,
};

/// A trip.
///
/// A trip is created open (`is_active`) when the truck leaves the depot and
/// is closed once its returns are counted. The financial fields are only
/// meaningful after the close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trip {
    pub id: i32,
    pub truck_matricule: String,
    pub driver_id: String,
    pub seller_id: String,
    pub assistant_id: Option<String>,
    pub date: NaiveDate,
    pub zone: String,
    pub is_active: bool,
    /// Value of the sold units at list price.
    pub waited_amount: Money,
    /// Cash handed back by the crew.
    pub received_amount: Money,
    pub benefit: Money,
    /// Variance carried by the seller into payroll.
    pub deff: Money,
}

/// A trip together with all its line items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TripDetail {
    pub trip: Trip,
    pub products: Vec<TripProduct>,
    pub boxes: Vec<TripBox>,
    pub wastes: Vec<TripWaste>,
    pub charges: Vec<TripCharge>,
}

impl TripDetail {
    #[must_use]
    pub fn product(&self, product_id: i32) -> Option<&TripProduct> {
        self.products.iter().find(|line| line.product_id == product_id)
    }

    #[must_use]
    pub fn box_line(&self, box_id: i32) -> Option<&TripBox> {
        self.boxes.iter().find(|line| line.box_id == box_id)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub truck_matricule: String,
    pub driver_id: String,
    pub seller_id: String,
    pub assistant_id: Option<String>,
    pub date: Date,
    pub zone: String,
    pub is_active: bool,
    pub waited_amount: i64,
    pub received_amount: i64,
    pub benefit: i64,
    pub deff: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trucks::Entity",
        from = "Column::TruckMatricule",
        to = "super::trucks::Column::Matricule",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Trucks,
    #[sea_orm(has_many = "super::trip_products::Entity")]
    TripProducts,
    #[sea_orm(has_many = "super::trip_boxes::Entity")]
    TripBoxes,
    #[sea_orm(has_many = "super::trip_wastes::Entity")]
    TripWastes,
    #[sea_orm(has_many = "super::trip_charges::Entity")]
    TripCharges,
}

impl Related<super::trucks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trucks.def()
    }
}

impl Related<super::trip_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripProducts.def()
    }
}

impl Related<super::trip_boxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripBoxes.def()
    }
}

impl Related<super::trip_wastes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripWastes.def()
    }
}

impl Related<super::trip_charges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripCharges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Trip {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            truck_matricule: model.truck_matricule,
            driver_id: model.driver_id,
            seller_id: model.seller_id,
            assistant_id: model.assistant_id,
            date: model.date,
            zone: model.zone,
            is_active: model.is_active,
            waited_amount: Money::new(model.waited_amount),
            received_amount: Money::new(model.received_amount),
            benefit: Money::new(model.benefit),
            deff: Money::new(model.deff),
        }
    }
}

impl From<&Trip> for ActiveModel {
    fn from(value: &Trip) -> Self {
        Self {
            id: ActiveValue::NotSet,
            truck_matricule: ActiveValue::Set(value.truck_matricule.clone()),
            driver_id: ActiveValue::Set(value.driver_id.clone()),
            seller_id: ActiveValue::Set(value.seller_id.clone()),
            assistant_id: ActiveValue::Set(value.assistant_id.clone()),
            date: ActiveValue::Set(value.date),
            zone: ActiveValue::Set(value.zone.clone()),
            is_active: ActiveValue::Set(value.is_active),
            waited_amount: ActiveValue::Set(value.waited_amount.cents()),
            received_amount: ActiveValue::Set(value.received_amount.cents()),
            benefit: ActiveValue::Set(value.benefit.cents()),
            deff: ActiveValue::Set(value.deff.cents()),
        }
    }
}
