//! Trip state machine: open → closed, plus the reads around it.

use sea_orm::{Condition, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, ResultEngine, Trip, TripCharge, TripDetail, charges, trip_boxes, trip_charges,
    trip_products, trip_wastes, trips,
};

use super::{Engine, with_tx};

mod close;
mod empty;
mod open;
mod transfer;

impl Engine {
    pub(super) async fn load_trip_detail(
        &self,
        db: &DatabaseTransaction,
        model: trips::Model,
    ) -> ResultEngine<TripDetail> {
        let products = model
            .find_related(trip_products::Entity)
            .order_by_asc(trip_products::Column::ProductId)
            .all(db)
            .await?;
        let boxes = model
            .find_related(trip_boxes::Entity)
            .order_by_asc(trip_boxes::Column::BoxId)
            .all(db)
            .await?;
        let wastes = model
            .find_related(trip_wastes::Entity)
            .order_by_asc(trip_wastes::Column::ProductId)
            .order_by_asc(trip_wastes::Column::Kind)
            .all(db)
            .await?;
        let charge_rows = trip_charges::Entity::find()
            .filter(trip_charges::Column::TripId.eq(model.id))
            .find_also_related(charges::Entity)
            .order_by_asc(trip_charges::Column::ChargeId)
            .all(db)
            .await?;

        let mut charge_list: Vec<TripCharge> = Vec::with_capacity(charge_rows.len());
        for (link, charge) in charge_rows {
            let charge = charge.ok_or_else(|| {
                EngineError::KeyNotFound(format!("charge {}", link.charge_id))
            })?;
            charge_list.push((link, charge).into());
        }

        Ok(TripDetail {
            trip: Trip::from(model),
            products: products.into_iter().map(Into::into).collect(),
            boxes: boxes.into_iter().map(Into::into).collect(),
            wastes: wastes.into_iter().map(Into::into).collect(),
            charges: charge_list,
        })
    }

    /// A trip with all its line items.
    pub async fn trip(&self, id: i32) -> ResultEngine<TripDetail> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip(&db_tx, id).await?;
            self.load_trip_detail(&db_tx, model).await
        })
    }

    /// The open trip of a truck, if any.
    pub async fn active_trip(&self, truck: &str) -> ResultEngine<Option<TripDetail>> {
        with_tx!(self, |db_tx| {
            self.require_truck(&db_tx, truck).await?;
            match self.find_active_trip(&db_tx, truck).await? {
                Some(model) => self.load_trip_detail(&db_tx, model).await.map(Some),
                None => Ok(None),
            }
        })
    }

    /// The most recently closed trip of a truck, the one whose residual a new
    /// trip would carry forward.
    pub async fn last_closed_trip(&self, truck: &str) -> ResultEngine<Option<TripDetail>> {
        with_tx!(self, |db_tx| {
            self.require_truck(&db_tx, truck).await?;
            match self.find_last_closed_trip(&db_tx, truck).await? {
                Some(model) => self.load_trip_detail(&db_tx, model).await.map(Some),
                None => Ok(None),
            }
        })
    }

    /// The trip of the same truck that came right before `id`.
    pub async fn previous_trip(&self, id: i32) -> ResultEngine<Option<TripDetail>> {
        with_tx!(self, |db_tx| {
            let current = self.require_trip(&db_tx, id).await?;
            let previous = trips::Entity::find()
                .filter(trips::Column::TruckMatricule.eq(current.truck_matricule.as_str()))
                .filter(
                    Condition::any()
                        .add(trips::Column::Date.lt(current.date))
                        .add(
                            Condition::all()
                                .add(trips::Column::Date.eq(current.date))
                                .add(trips::Column::Id.lt(current.id)),
                        ),
                )
                .order_by_desc(trips::Column::Date)
                .order_by_desc(trips::Column::Id)
                .one(&db_tx)
                .await?;
            match previous {
                Some(model) => self.load_trip_detail(&db_tx, model).await.map(Some),
                None => Ok(None),
            }
        })
    }

    /// Every open trip, one per truck at most.
    pub async fn active_trips(&self) -> ResultEngine<Vec<Trip>> {
        with_tx!(self, |db_tx| {
            let models = trips::Entity::find()
                .filter(trips::Column::IsActive.eq(true))
                .order_by_asc(trips::Column::TruckMatricule)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Trip::from).collect())
        })
    }
}
