use sea_orm::entity::{ActiveValue, prelude::*};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Truck {
    pub matricule: String,
    pub capacity: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trucks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub matricule: String,
    pub capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trips::Entity")]
    Trips,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Truck {
    fn from(model: Model) -> Self {
        Self {
            matricule: model.matricule,
            capacity: model.capacity,
        }
    }
}

impl From<&Truck> for ActiveModel {
    fn from(value: &Truck) -> Self {
        Self {
            matricule: ActiveValue::Set(value.matricule.clone()),
            capacity: ActiveValue::Set(value.capacity),
        }
    }
}
