use sea_orm::{ActiveValue, prelude::*};

use crate::{EngineError, ResultEngine, TripDetail, trip_boxes, trip_products};

use super::super::{Engine, StockField, normalize_required, with_tx};

impl Engine {
    /// Unload a parked truck back into the warehouse.
    ///
    /// The residual of the truck's last closed trip returns to product stock,
    /// and each box brought back is counted into `in_stock`, `sent` and
    /// `empty`. The residual fields are zeroed afterwards, so calling this
    /// twice releases nothing the second time.
    pub async fn empty_truck(&self, matricule: &str) -> ResultEngine<TripDetail> {
        let truck = normalize_required(matricule, "truck")?;

        with_tx!(self, |db_tx| {
            self.require_truck(&db_tx, &truck).await?;
            if let Some(open) = self.find_active_trip(&db_tx, &truck).await? {
                return Err(EngineError::ExistingKey(format!(
                    "open trip {} for truck {truck}",
                    open.id
                )));
            }
            let trip = self
                .find_last_closed_trip(&db_tx, &truck)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("closed trip for truck {truck}")))?;

            let mut released = 0;
            for line in trip.find_related(trip_products::Entity).all(&db_tx).await? {
                if line.qtt_reutour == 0 && line.qtt_reutour_unite == 0 {
                    continue;
                }
                self.release(
                    &db_tx,
                    &StockField::ProductBoxes(line.product_id),
                    line.qtt_reutour,
                )
                .await?;
                self.release(
                    &db_tx,
                    &StockField::ProductUnits(line.product_id),
                    line.qtt_reutour_unite,
                )
                .await?;
                trip_products::ActiveModel {
                    trip_id: ActiveValue::Unchanged(line.trip_id),
                    product_id: ActiveValue::Unchanged(line.product_id),
                    qtt_reutour: ActiveValue::Set(0),
                    qtt_reutour_unite: ActiveValue::Set(0),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
                released += 1;
            }

            for line in trip.find_related(trip_boxes::Entity).all(&db_tx).await? {
                if line.qtt_in == 0 && line.qtt_out == 0 {
                    continue;
                }
                if line.qtt_in > 0 {
                    for field in [
                        StockField::BoxInStock(line.box_id),
                        StockField::BoxSent(line.box_id),
                        StockField::BoxEmpty(line.box_id),
                    ] {
                        self.release(&db_tx, &field, line.qtt_in).await?;
                    }
                }
                trip_boxes::ActiveModel {
                    trip_id: ActiveValue::Unchanged(line.trip_id),
                    box_id: ActiveValue::Unchanged(line.box_id),
                    qtt_in: ActiveValue::Set(0),
                    qtt_out: ActiveValue::Set(0),
                }
                .update(&db_tx)
                .await?;
                released += 1;
            }

            tracing::info!(trip_id = trip.id, %truck, lines = released, "truck emptied");
            self.load_trip_detail(&db_tx, trip).await
        })
    }
}
