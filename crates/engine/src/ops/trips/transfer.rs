use std::collections::BTreeSet;

use sea_orm::{ActiveValue, prelude::*};

use crate::{
    EngineError, ResultEngine, TransferCmd, TripBox, TripDetail, TripProduct, trip_boxes,
    trip_products,
    util::ensure_non_negative,
};

use super::super::{Engine, with_tx};

impl Engine {
    /// Move what is left on a source trip onto an open destination trip.
    ///
    /// For every listed product the destination line receives the source's
    /// unreturned quantity (`qtt_out - qtt_reutour`, floored at zero) plus the
    /// requested additional quantity. Boxes work the same with
    /// `qtt_out - qtt_in`. Warehouse counters and the source trip are not
    /// touched.
    pub async fn transfer_products(&self, cmd: TransferCmd) -> ResultEngine<TripDetail> {
        if cmd.source_trip == cmd.destination_trip {
            return Err(EngineError::InvalidInput(format!(
                "cannot transfer trip {} onto itself",
                cmd.source_trip
            )));
        }
        let mut seen = BTreeSet::new();
        for line in &cmd.products {
            if !seen.insert(line.product_id) {
                return Err(EngineError::InvalidInput(format!(
                    "product {} listed twice",
                    line.product_id
                )));
            }
            ensure_non_negative(
                line.additional_qtt,
                &format!("product {} additional_qtt", line.product_id),
            )?;
            ensure_non_negative(
                line.additional_qtt_unite,
                &format!("product {} additional_qtt_unite", line.product_id),
            )?;
        }
        seen.clear();
        for line in &cmd.boxes {
            if !seen.insert(line.box_id) {
                return Err(EngineError::InvalidInput(format!(
                    "box {} listed twice",
                    line.box_id
                )));
            }
            ensure_non_negative(
                line.additional_qtt,
                &format!("box {} additional_qtt", line.box_id),
            )?;
        }

        with_tx!(self, |db_tx| {
            let destination = self.require_trip(&db_tx, cmd.destination_trip).await?;
            if !destination.is_active {
                return Err(EngineError::TripClosed(format!("trip {}", destination.id)));
            }
            let source = self.require_trip(&db_tx, cmd.source_trip).await?;

            let source_products = source.find_related(trip_products::Entity).all(&db_tx).await?;
            let destination_products = destination
                .find_related(trip_products::Entity)
                .all(&db_tx)
                .await?;
            for line in &cmd.products {
                let from = source_products
                    .iter()
                    .find(|row| row.product_id == line.product_id)
                    .ok_or_else(|| {
                        EngineError::InvalidInput(format!(
                            "product {} is not on trip {}",
                            line.product_id, source.id
                        ))
                    })?;
                let remaining = (from.qtt_out - from.qtt_reutour).max(0);
                let remaining_units = (from.qtt_out_unite - from.qtt_reutour_unite).max(0);
                if remaining == 0 && remaining_units == 0 {
                    return Err(EngineError::InvalidQuantity(format!(
                        "nothing left of product {} on trip {}",
                        line.product_id, source.id
                    )));
                }
                let qtt = remaining + line.additional_qtt;
                let units = remaining_units + line.additional_qtt_unite;

                match destination_products
                    .iter()
                    .find(|row| row.product_id == line.product_id)
                {
                    Some(existing) => {
                        trip_products::ActiveModel {
                            trip_id: ActiveValue::Unchanged(existing.trip_id),
                            product_id: ActiveValue::Unchanged(existing.product_id),
                            qtt_out: ActiveValue::Set(existing.qtt_out + qtt),
                            qtt_out_unite: ActiveValue::Set(existing.qtt_out_unite + units),
                            ..Default::default()
                        }
                        .update(&db_tx)
                        .await?;
                    }
                    None => {
                        let row = TripProduct {
                            trip_id: destination.id,
                            product_id: line.product_id,
                            qtt_out: qtt,
                            qtt_out_unite: units,
                            ..TripProduct::default()
                        };
                        trip_products::ActiveModel::from(&row).insert(&db_tx).await?;
                    }
                }
            }

            let source_boxes = source.find_related(trip_boxes::Entity).all(&db_tx).await?;
            let destination_boxes = destination
                .find_related(trip_boxes::Entity)
                .all(&db_tx)
                .await?;
            for line in &cmd.boxes {
                let from = source_boxes
                    .iter()
                    .find(|row| row.box_id == line.box_id)
                    .ok_or_else(|| {
                        EngineError::InvalidInput(format!(
                            "box {} is not on trip {}",
                            line.box_id, source.id
                        ))
                    })?;
                let remaining = (from.qtt_out - from.qtt_in).max(0);
                if remaining == 0 {
                    return Err(EngineError::InvalidQuantity(format!(
                        "nothing left of box {} on trip {}",
                        line.box_id, source.id
                    )));
                }
                let qtt = remaining + line.additional_qtt;

                match destination_boxes.iter().find(|row| row.box_id == line.box_id) {
                    Some(existing) => {
                        trip_boxes::ActiveModel {
                            trip_id: ActiveValue::Unchanged(existing.trip_id),
                            box_id: ActiveValue::Unchanged(existing.box_id),
                            qtt_out: ActiveValue::Set(existing.qtt_out + qtt),
                            ..Default::default()
                        }
                        .update(&db_tx)
                        .await?;
                    }
                    None => {
                        let row = TripBox {
                            trip_id: destination.id,
                            box_id: line.box_id,
                            qtt_out: qtt,
                            qtt_in: 0,
                        };
                        trip_boxes::ActiveModel::from(&row).insert(&db_tx).await?;
                    }
                }
            }

            tracing::info!(
                source = source.id,
                destination = destination.id,
                products = cmd.products.len(),
                boxes = cmd.boxes.len(),
                "trip transferred"
            );
            self.load_trip_detail(&db_tx, destination).await
        })
    }
}
