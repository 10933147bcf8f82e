use std::collections::BTreeMap;

use sea_orm::{ActiveValue, QueryFilter, prelude::*, sea_query::Expr};

use crate::{
    BoxReturn, ChargeLine, CloseTripCmd, EngineError, Money, ProductReturn, ResultEngine,
    TripDetail, TripWaste, charges, settlement::TripFigures,
    settlement::sold_units, trip_boxes, trip_charges, trip_products, trip_wastes, trips,
    util::{ensure_non_negative, ensure_non_negative_amount, ensure_positive_amount},
};

use super::super::{Engine, StockField, merge_wastes, normalize_required, with_tx};

fn index_product_returns(lines: &[ProductReturn]) -> ResultEngine<BTreeMap<i32, (i32, i32)>> {
    let mut indexed = BTreeMap::new();
    for line in lines {
        ensure_non_negative(
            line.qtt_reutour,
            &format!("product {} qtt_reutour", line.product_id),
        )?;
        ensure_non_negative(
            line.qtt_reutour_unite,
            &format!("product {} qtt_reutour_unite", line.product_id),
        )?;
        if indexed
            .insert(line.product_id, (line.qtt_reutour, line.qtt_reutour_unite))
            .is_some()
        {
            return Err(EngineError::InvalidInput(format!(
                "product {} returned twice",
                line.product_id
            )));
        }
    }
    Ok(indexed)
}

fn index_box_returns(lines: &[BoxReturn]) -> ResultEngine<BTreeMap<i32, i32>> {
    let mut indexed = BTreeMap::new();
    for line in lines {
        ensure_non_negative(line.qtt_in, &format!("box {} qtt_in", line.box_id))?;
        if indexed.insert(line.box_id, line.qtt_in).is_some() {
            return Err(EngineError::InvalidInput(format!(
                "box {} returned twice",
                line.box_id
            )));
        }
    }
    Ok(indexed)
}

fn validate_charges(lines: &[ChargeLine]) -> ResultEngine<Vec<(String, Money)>> {
    lines
        .iter()
        .map(|line| {
            let kind = normalize_required(&line.kind, "charge kind")?;
            ensure_positive_amount(line.amount, &format!("charge {kind}"))?;
            Ok((kind, line.amount))
        })
        .collect()
}

impl Engine {
    /// Close an open trip and settle it.
    ///
    /// Sold units are derived from what was dispatched minus what came
    /// back; product lines missing from `cmd.products` count as fully
    /// returned. Returned boxes move from `sent` to `empty`, waste is added to
    /// the global balances and charges are booked at the trip date. The trip
    /// then stores:
    ///
    /// - `waited_amount`: Σ price × sold units
    /// - `benefit`: received − charges
    /// - `deff`: received − waited + charges + waste cost
    ///
    /// A trip is settled once: closing it again fails with `TripClosed`.
    pub async fn close_trip(&self, cmd: CloseTripCmd) -> ResultEngine<TripDetail> {
        ensure_non_negative_amount(cmd.received_amount, "received_amount")?;
        let product_returns = index_product_returns(&cmd.products)?;
        let box_returns = index_box_returns(&cmd.boxes)?;
        let waste_lines = merge_wastes(&cmd.wastes)?;
        let charge_lines = validate_charges(&cmd.charges)?;

        with_tx!(self, |db_tx| {
            let trip = self.require_trip(&db_tx, cmd.trip_id).await?;
            let claimed = trips::Entity::update_many()
                .col_expr(trips::Column::IsActive, Expr::value(false))
                .filter(trips::Column::Id.eq(trip.id))
                .filter(trips::Column::IsActive.eq(true))
                .exec(&db_tx)
                .await?
                .rows_affected;
            if claimed == 0 {
                return Err(EngineError::TripClosed(format!("trip {}", trip.id)));
            }

            let product_lines = trip.find_related(trip_products::Entity).all(&db_tx).await?;
            if let Some(missing) = product_returns
                .keys()
                .find(|id| !product_lines.iter().any(|line| line.product_id == **id))
            {
                return Err(EngineError::KeyNotFound(format!(
                    "product {missing} on trip {}",
                    trip.id
                )));
            }

            let mut waited = Money::ZERO;
            for line in product_lines {
                let product = self.require_product(&db_tx, line.product_id).await?;
                let (back, back_units) = product_returns
                    .get(&line.product_id)
                    .copied()
                    .unwrap_or((line.qtt_out, line.qtt_out_unite));
                if back > line.qtt_out {
                    return Err(EngineError::InvalidQuantity(format!(
                        "product {}: {back} boxes returned but {} dispatched",
                        line.product_id, line.qtt_out
                    )));
                }
                let sold = sold_units(
                    product.capacity_by_box,
                    line.qtt_out,
                    line.qtt_out_unite,
                    back,
                    back_units,
                );
                if sold < 0 {
                    return Err(EngineError::InvalidQuantity(format!(
                        "product {}: more units returned than dispatched",
                        line.product_id
                    )));
                }
                let sold_i32 = i32::try_from(sold).map_err(|_| {
                    EngineError::InvalidQuantity(format!(
                        "product {}: sold quantity too large",
                        line.product_id
                    ))
                })?;
                waited += Money::new(product.price_unite).times(sold);

                trip_products::ActiveModel {
                    trip_id: ActiveValue::Unchanged(line.trip_id),
                    product_id: ActiveValue::Unchanged(line.product_id),
                    qtt_reutour: ActiveValue::Set(back),
                    qtt_reutour_unite: ActiveValue::Set(back_units),
                    qtt_vendu: ActiveValue::Set(sold_i32),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
            }

            let box_lines = trip.find_related(trip_boxes::Entity).all(&db_tx).await?;
            for (&box_id, &qtt_in) in &box_returns {
                let line = box_lines
                    .iter()
                    .find(|line| line.box_id == box_id)
                    .ok_or_else(|| {
                        EngineError::KeyNotFound(format!("box {box_id} on trip {}", trip.id))
                    })?;
                if qtt_in > line.qtt_out {
                    return Err(EngineError::InvalidQuantity(format!(
                        "box {box_id}: {qtt_in} returned but {} dispatched",
                        line.qtt_out
                    )));
                }
                trip_boxes::ActiveModel {
                    trip_id: ActiveValue::Unchanged(line.trip_id),
                    box_id: ActiveValue::Unchanged(line.box_id),
                    qtt_in: ActiveValue::Set(qtt_in),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
                self.release(&db_tx, &StockField::BoxEmpty(box_id), qtt_in)
                    .await?;
                self.settle_sent(&db_tx, box_id, qtt_in).await?;
            }

            let mut waste_cost = Money::ZERO;
            for ((product_id, kind), qtt) in waste_lines {
                let product = self.require_product(&db_tx, product_id).await?;
                let row = TripWaste {
                    trip_id: trip.id,
                    product_id,
                    kind: kind.clone(),
                    qtt,
                };
                trip_wastes::ActiveModel::from(&row).insert(&db_tx).await?;
                self.release(&db_tx, &StockField::Waste { product_id, kind }, qtt)
                    .await?;
                waste_cost += Money::new(product.price_unite).times(i64::from(qtt));
            }

            let mut total_charges = Money::ZERO;
            for (kind, amount) in charge_lines {
                let charge = charges::ActiveModel {
                    id: ActiveValue::NotSet,
                    kind: ActiveValue::Set(kind),
                    amount: ActiveValue::Set(amount.cents()),
                    date: ActiveValue::Set(trip.date),
                }
                .insert(&db_tx)
                .await?;
                trip_charges::ActiveModel {
                    trip_id: ActiveValue::Set(trip.id),
                    charge_id: ActiveValue::Set(charge.id),
                    amount: ActiveValue::Set(amount.cents()),
                }
                .insert(&db_tx)
                .await?;
                total_charges += amount;
            }

            let figures =
                TripFigures::settle(waited, cmd.received_amount, total_charges, waste_cost);
            let model = trips::ActiveModel {
                id: ActiveValue::Unchanged(trip.id),
                waited_amount: ActiveValue::Set(figures.waited.cents()),
                received_amount: ActiveValue::Set(figures.received.cents()),
                benefit: ActiveValue::Set(figures.benefit.cents()),
                deff: ActiveValue::Set(figures.deff.cents()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            tracing::info!(
                trip_id = model.id,
                waited = %figures.waited,
                received = %figures.received,
                benefit = %figures.benefit,
                deff = %figures.deff,
                "trip closed"
            );
            self.load_trip_detail(&db_tx, model).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WasteLine;

    #[test]
    fn duplicate_returns_are_rejected() {
        let lines = vec![
            ProductReturn {
                product_id: 2,
                qtt_reutour: 1,
                qtt_reutour_unite: 0,
            },
            ProductReturn {
                product_id: 2,
                qtt_reutour: 0,
                qtt_reutour_unite: 4,
            },
        ];
        assert_eq!(
            index_product_returns(&lines),
            Err(EngineError::InvalidInput("product 2 returned twice".to_string()))
        );
    }

    #[test]
    fn waste_lines_merge_and_need_positive_qtt() {
        let lines = vec![
            WasteLine {
                product_id: 1,
                kind: "broken".to_string(),
                qtt: 2,
            },
            WasteLine {
                product_id: 1,
                kind: " broken ".to_string(),
                qtt: 3,
            },
        ];
        let merged = merge_wastes(&lines).unwrap();
        assert_eq!(merged.get(&(1, "broken".to_string())), Some(&5));

        let zero = vec![WasteLine {
            product_id: 1,
            kind: "expired".to_string(),
            qtt: 0,
        }];
        assert!(matches!(
            merge_wastes(&zero),
            Err(EngineError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn charges_need_kind_and_positive_amount() {
        let ok = vec![ChargeLine {
            kind: "fuel".to_string(),
            amount: Money::new(2_500),
        }];
        assert_eq!(
            validate_charges(&ok).unwrap(),
            vec![("fuel".to_string(), Money::new(2_500))]
        );

        let negative = vec![ChargeLine {
            kind: "toll".to_string(),
            amount: Money::new(-1),
        }];
        assert!(matches!(
            validate_charges(&negative),
            Err(EngineError::InvalidAmount(_))
        ));

        let unnamed = vec![ChargeLine {
            kind: "  ".to_string(),
            amount: Money::new(100),
        }];
        assert!(matches!(
            validate_charges(&unnamed),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
