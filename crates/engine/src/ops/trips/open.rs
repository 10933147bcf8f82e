use std::collections::BTreeMap;

use sea_orm::prelude::*;

use crate::{
    BoxLoad, EngineError, Money, OpenTripCmd, ProductLoad, ResultEngine, Trip, TripBox,
    TripDetail, TripProduct, trip_boxes, trip_products, trips,
    util::{ensure_non_negative, is_unique_violation},
};

use super::super::{Engine, StockField, normalize_optional_text, normalize_required, with_tx};

/// Requested product quantities keyed by product, as `(boxes, units)`.
/// Repeated products are summed.
pub(super) fn merge_product_loads(lines: &[ProductLoad]) -> ResultEngine<BTreeMap<i32, (i32, i32)>> {
    let mut merged: BTreeMap<i32, (i32, i32)> = BTreeMap::new();
    for line in lines {
        ensure_non_negative(line.qtt_out, &format!("product {} qtt_out", line.product_id))?;
        ensure_non_negative(
            line.qtt_out_unite,
            &format!("product {} qtt_out_unite", line.product_id),
        )?;
        let entry = merged.entry(line.product_id).or_default();
        entry.0 += line.qtt_out;
        entry.1 += line.qtt_out_unite;
    }
    Ok(merged)
}

pub(super) fn merge_box_loads(lines: &[BoxLoad]) -> ResultEngine<BTreeMap<i32, i32>> {
    let mut merged: BTreeMap<i32, i32> = BTreeMap::new();
    for line in lines {
        ensure_non_negative(line.qtt_out, &format!("box {} qtt_out", line.box_id))?;
        *merged.entry(line.box_id).or_default() += line.qtt_out;
    }
    Ok(merged)
}

impl Engine {
    /// Open a trip for a truck.
    ///
    /// Whatever the truck brought back from its last closed trip is loaded
    /// again on top of the requested quantities. Only the requested
    /// quantities are taken from the warehouse: the carried residual never
    /// went back to stock.
    ///
    /// Fails with `ExistingKey` if the truck already has an open trip, with
    /// `InvalidInput` when the date is earlier than the truck's last closed
    /// trip, with `KeyNotFound` for unknown truck, crew, products or boxes, and with
    /// `InsufficientStock` when the warehouse cannot cover the request.
    pub async fn open_trip(&self, cmd: OpenTripCmd) -> ResultEngine<TripDetail> {
        let truck = normalize_required(&cmd.truck, "truck")?;
        let driver = normalize_required(&cmd.driver, "driver")?;
        let seller = normalize_required(&cmd.seller, "seller")?;
        let assistant = normalize_optional_text(cmd.assistant.as_deref());
        let zone = normalize_required(&cmd.zone, "zone")?;
        let requested_products = merge_product_loads(&cmd.products)?;
        let requested_boxes = merge_box_loads(&cmd.boxes)?;

        with_tx!(self, |db_tx| {
            self.require_truck(&db_tx, &truck).await?;
            if let Some(open) = self.find_active_trip(&db_tx, &truck).await? {
                return Err(EngineError::ExistingKey(format!(
                    "open trip {} for truck {truck}",
                    open.id
                )));
            }
            let previous = self.find_last_closed_trip(&db_tx, &truck).await?;
            if let Some(last) = previous.as_ref().filter(|last| cmd.date < last.date) {
                return Err(EngineError::InvalidInput(format!(
                    "trip date {} is before trip {} of truck {truck} ({})",
                    cmd.date, last.id, last.date
                )));
            }
            self.require_employee(&db_tx, &driver).await?;
            self.require_employee(&db_tx, &seller).await?;
            if let Some(cin) = &assistant {
                self.require_employee(&db_tx, cin).await?;
            }

            for (&product_id, &(boxes, units)) in &requested_products {
                let product = self.require_product(&db_tx, product_id).await?;
                if boxes > product.stock || units > product.unite_in_stock {
                    return Err(EngineError::InsufficientStock(format!(
                        "product {product_id}: requested {boxes} boxes and {units} units, \
                         available {} boxes and {} units",
                        product.stock, product.unite_in_stock
                    )));
                }
            }
            for (&box_id, &qtt) in &requested_boxes {
                let model = self.require_box(&db_tx, box_id).await?;
                if qtt > model.in_stock {
                    return Err(EngineError::InsufficientStock(format!(
                        "box {box_id}: requested {qtt}, available {}",
                        model.in_stock
                    )));
                }
            }

            let mut product_lines = requested_products.clone();
            let mut box_lines = requested_boxes.clone();
            if let Some(previous) = previous {
                for line in previous.find_related(trip_products::Entity).all(&db_tx).await? {
                    if line.qtt_reutour == 0 && line.qtt_reutour_unite == 0 {
                        continue;
                    }
                    let entry = product_lines.entry(line.product_id).or_default();
                    entry.0 += line.qtt_reutour;
                    entry.1 += line.qtt_reutour_unite;
                }
                for line in previous.find_related(trip_boxes::Entity).all(&db_tx).await? {
                    if line.qtt_in == 0 {
                        continue;
                    }
                    *box_lines.entry(line.box_id).or_default() += line.qtt_in;
                }
                tracing::debug!(
                    previous_trip = previous.id,
                    %truck,
                    "carrying residual forward"
                );
            }

            let trip = Trip {
                id: 0,
                truck_matricule: truck.clone(),
                driver_id: driver,
                seller_id: seller,
                assistant_id: assistant,
                date: cmd.date,
                zone,
                is_active: true,
                waited_amount: Money::ZERO,
                received_amount: Money::ZERO,
                benefit: Money::ZERO,
                deff: Money::ZERO,
            };
            // A concurrent opener that got past the check above trips the
            // partial unique index instead.
            let model = trips::ActiveModel::from(&trip)
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        EngineError::ExistingKey(format!("open trip for truck {truck}"))
                    } else {
                        err.into()
                    }
                })?;

            for (&product_id, &(qtt_out, qtt_out_unite)) in &product_lines {
                let line = TripProduct {
                    trip_id: model.id,
                    product_id,
                    qtt_out,
                    qtt_out_unite,
                    ..TripProduct::default()
                };
                trip_products::ActiveModel::from(&line).insert(&db_tx).await?;
            }
            for (&box_id, &qtt_out) in &box_lines {
                let line = TripBox {
                    trip_id: model.id,
                    box_id,
                    qtt_out,
                    qtt_in: 0,
                };
                trip_boxes::ActiveModel::from(&line).insert(&db_tx).await?;
            }

            for (&product_id, &(boxes, units)) in &requested_products {
                self.reserve(&db_tx, &StockField::ProductBoxes(product_id), boxes)
                    .await?;
                self.reserve(&db_tx, &StockField::ProductUnits(product_id), units)
                    .await?;
            }
            for (&box_id, &qtt) in &requested_boxes {
                self.reserve(&db_tx, &StockField::BoxInStock(box_id), qtt)
                    .await?;
                self.release(&db_tx, &StockField::BoxSent(box_id), qtt)
                    .await?;
            }

            tracing::info!(
                trip_id = model.id,
                %truck,
                products = product_lines.len(),
                boxes = box_lines.len(),
                "trip opened"
            );
            self.load_trip_detail(&db_tx, model).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_loads_are_summed() {
        let lines = vec![
            ProductLoad {
                product_id: 1,
                qtt_out: 2,
                qtt_out_unite: 3,
            },
            ProductLoad {
                product_id: 1,
                qtt_out: 1,
                qtt_out_unite: 0,
            },
        ];
        let merged = merge_product_loads(&lines).unwrap();
        assert_eq!(merged.get(&1), Some(&(3, 3)));
    }

    #[test]
    fn negative_load_is_rejected() {
        let lines = vec![BoxLoad {
            box_id: 4,
            qtt_out: -2,
        }];
        assert_eq!(
            merge_box_loads(&lines),
            Err(EngineError::InvalidQuantity(
                "box 4 qtt_out must be >= 0, got -2".to_string()
            ))
        );
    }
}
