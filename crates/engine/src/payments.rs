//! Monthly payroll records.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(EngineError::InvalidInput(format!(
                "invalid payment status: {value}"
            ))),
        }
    }
}

/// Pay computed for one employee over one calendar month.
///
/// `credit` is what the employee owes (or is owed) from trip settlements,
/// including the credit of every earlier payment still pending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: i32,
    pub employee_cin: String,
    pub month: u32,
    pub year: i32,
    pub total: Money,
    pub credit: Money,
    pub net_pay: Money,
    pub status: PaymentStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_cin: String,
    pub month: i32,
    pub year: i32,
    pub total: i64,
    pub credit: i64,
    pub net_pay: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeCin",
        to = "super::employees::Column::Cin",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Employees,
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month = u32::try_from(model.month)
            .map_err(|_| EngineError::InvalidInput(format!("invalid month: {}", model.month)))?;
        Ok(Self {
            status: PaymentStatus::try_from(model.status.as_str())?,
            id: model.id,
            employee_cin: model.employee_cin,
            month,
            year: model.year,
            total: Money::new(model.total),
            credit: Money::new(model.credit),
            net_pay: Money::new(model.net_pay),
        })
    }
}

impl From<&Payment> for ActiveModel {
    fn from(value: &Payment) -> Self {
        Self {
            id: ActiveValue::NotSet,
            employee_cin: ActiveValue::Set(value.employee_cin.clone()),
            month: ActiveValue::Set(value.month as i32),
            year: ActiveValue::Set(value.year),
            total: ActiveValue::Set(value.total.cents()),
            credit: ActiveValue::Set(value.credit.cents()),
            net_pay: ActiveValue::Set(value.net_pay.cents()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
        }
    }
}
