use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Employee, EngineError, Money, Payment, PaymentCmd, PaymentStatus, ResultEngine, Role, payments,
    settlement::{TripTotals, monthly_pay},
    trips,
    util::{is_unique_violation, month_bounds},
};

use super::{Engine, normalize_required, with_tx};

impl Engine {
    /// Compute and store the pay of an employee for one month.
    ///
    /// Only trips closed within the month count. Sellers are credited the
    /// trip variance plus a commission on the expected amount; drivers and
    /// assistants are debited the gap between cash received and cash
    /// expected. The credit of every payment still pending is carried into
    /// the new one.
    pub async fn create_employee_payment(&self, cmd: PaymentCmd) -> ResultEngine<Payment> {
        let (first_day, last_day) = month_bounds(cmd.year, cmd.month)?;
        let cin = normalize_required(&cmd.employee_cin, "employee cin")?;
        let month = i32::try_from(cmd.month)
            .map_err(|_| EngineError::InvalidInput(format!("invalid month: {}", cmd.month)))?;

        with_tx!(self, |db_tx| {
            let employee = Employee::try_from(self.require_employee(&db_tx, &cin).await?)?;

            let existing = payments::Entity::find()
                .filter(payments::Column::EmployeeCin.eq(cin.as_str()))
                .filter(payments::Column::Month.eq(month))
                .filter(payments::Column::Year.eq(cmd.year))
                .one(&db_tx)
                .await?;
            if let Some(existing) = existing {
                return Err(EngineError::ExistingKey(format!(
                    "payment {} for {cin} {}/{}",
                    existing.id, cmd.month, cmd.year
                )));
            }

            let pending_credit: Money = payments::Entity::find()
                .filter(payments::Column::EmployeeCin.eq(cin.as_str()))
                .filter(payments::Column::Status.eq(PaymentStatus::Pending.as_str()))
                .all(&db_tx)
                .await?
                .iter()
                .map(|row| Money::new(row.credit))
                .sum();

            let crew = match employee.role {
                Role::Seller => Condition::all().add(trips::Column::SellerId.eq(cin.as_str())),
                Role::Driver | Role::Assistant => Condition::any()
                    .add(trips::Column::DriverId.eq(cin.as_str()))
                    .add(trips::Column::AssistantId.eq(cin.as_str())),
            };
            let totals: Vec<TripTotals> = trips::Entity::find()
                .filter(trips::Column::IsActive.eq(false))
                .filter(trips::Column::Date.between(first_day, last_day))
                .filter(crew)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|trip| TripTotals {
                    waited: Money::new(trip.waited_amount),
                    received: Money::new(trip.received_amount),
                    deff: Money::new(trip.deff),
                })
                .collect();

            let figures = monthly_pay(
                employee.role,
                employee.salary_fix,
                &totals,
                pending_credit,
                self.settings.commission_per_mille,
            );
            let payment = Payment {
                id: 0,
                employee_cin: cin.clone(),
                month: cmd.month,
                year: cmd.year,
                total: figures.total,
                credit: figures.credit,
                net_pay: figures.net_pay,
                status: cmd.status,
            };
            let model = payments::ActiveModel::from(&payment)
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        EngineError::ExistingKey(format!(
                            "payment for {cin} {}/{}",
                            cmd.month, cmd.year
                        ))
                    } else {
                        err.into()
                    }
                })?;

            tracing::info!(
                payment_id = model.id,
                %cin,
                trips = totals.len(),
                credit = %figures.credit,
                net_pay = %figures.net_pay,
                "payment created"
            );
            Payment::try_from(model)
        })
    }

    pub async fn payment(&self, id: i32) -> ResultEngine<Payment> {
        with_tx!(self, |db_tx| {
            Payment::try_from(self.require_payment(&db_tx, id).await?)
        })
    }

    pub async fn update_payment_status(
        &self,
        id: i32,
        status: PaymentStatus,
    ) -> ResultEngine<Payment> {
        with_tx!(self, |db_tx| {
            self.require_payment(&db_tx, id).await?;
            let model = payments::ActiveModel {
                id: ActiveValue::Unchanged(id),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            tracing::info!(payment_id = id, status = status.as_str(), "payment status updated");
            Payment::try_from(model)
        })
    }

    /// Payments of an employee, most recent period first.
    pub async fn payments_for_employee(&self, cin: &str) -> ResultEngine<Vec<Payment>> {
        with_tx!(self, |db_tx| {
            self.require_employee(&db_tx, cin).await?;
            payments::Entity::find()
                .filter(payments::Column::EmployeeCin.eq(cin))
                .order_by_desc(payments::Column::Year)
                .order_by_desc(payments::Column::Month)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Payment::try_from)
                .collect()
        })
    }
}
