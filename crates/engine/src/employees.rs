//! Employees and the role they play on a trip.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// Role of an employee.
///
/// Payroll treats sellers differently from the rest of the crew: a seller
/// earns a commission and carries the trip variance, drivers and assistants
/// are charged for the cash shortfall of the trips they worked on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seller,
    Driver,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Driver => "driver",
            Self::Assistant => "assistant",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "seller" => Ok(Self::Seller),
            "driver" => Ok(Self::Driver),
            "assistant" => Ok(Self::Assistant),
            other => Err(EngineError::InvalidInput(format!(
                "invalid employee role: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub cin: String,
    pub name: String,
    pub tel: Option<String>,
    pub address: Option<String>,
    pub salary_fix: Money,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cin: String,
    pub name: String,
    pub tel: Option<String>,
    pub address: Option<String>,
    pub salary_fix: i64,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Employee {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: Role::try_from(model.role.as_str())?,
            cin: model.cin,
            name: model.name,
            tel: model.tel,
            address: model.address,
            salary_fix: Money::new(model.salary_fix),
        })
    }
}

impl From<&Employee> for ActiveModel {
    fn from(value: &Employee) -> Self {
        Self {
            cin: ActiveValue::Set(value.cin.clone()),
            name: ActiveValue::Set(value.name.clone()),
            tel: ActiveValue::Set(value.tel.clone()),
            address: ActiveValue::Set(value.address.clone()),
            salary_fix: ActiveValue::Set(value.salary_fix.cents()),
            role: ActiveValue::Set(value.role.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage() {
        for role in [Role::Seller, Role::Driver, Role::Assistant] {
            assert_eq!(Role::try_from(role.as_str()), Ok(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(
            Role::try_from("boss"),
            Err(EngineError::InvalidInput(
                "invalid employee role: boss".to_string()
            ))
        );
    }
}
