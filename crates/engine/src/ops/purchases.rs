//! Supplier deliveries.
//!
//! A purchase brings products and full boxes into the warehouse and hands
//! empty boxes and accumulated waste back to the supplier, all in one
//! transaction. The supplier is told about the boxes and waste only once
//! that transaction has committed.

use std::collections::BTreeMap;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryOrder, prelude::*};

use crate::{
    EngineError, Money, PurchaseBoxLine, PurchaseCmd, PurchaseDetail, PurchaseProductLine,
    ResultEngine, SupplierNotice, WasteLine, purchase_boxes, purchase_products, purchase_wastes,
    purchases,
    util::{ensure_non_negative, ensure_positive, ensure_positive_amount},
};

use super::{Engine, StockField, merge_wastes, with_tx};

/// Purchase lines after validation.
#[derive(Debug)]
struct PurchaseLines {
    products: BTreeMap<i32, PurchaseProductLine>,
    boxes: Vec<PurchaseBoxLine>,
    wastes: BTreeMap<(i32, String), i32>,
}

impl PurchaseLines {
    fn validate(cmd: &PurchaseCmd) -> ResultEngine<Self> {
        let mut products = BTreeMap::new();
        for line in &cmd.products {
            ensure_positive(line.qtt, &format!("product {} qtt", line.product_id))?;
            ensure_non_negative(line.qtt_unite, &format!("product {} qtt_unite", line.product_id))?;
            ensure_positive_amount(line.price, &format!("product {} price", line.product_id))?;
            if products.insert(line.product_id, line.clone()).is_some() {
                return Err(EngineError::InvalidInput(format!(
                    "product {} listed twice",
                    line.product_id
                )));
            }
        }
        for line in &cmd.boxes {
            ensure_non_negative(line.qtt_in, &format!("box {} qtt_in", line.box_id))?;
            ensure_non_negative(line.qtt_out, &format!("box {} qtt_out", line.box_id))?;
        }
        let wastes = merge_wastes(&cmd.wastes)?;
        if wastes.len() != cmd.wastes.len() {
            return Err(EngineError::InvalidInput(
                "waste listed twice for the same product and kind".to_string(),
            ));
        }
        Ok(Self {
            products,
            boxes: cmd.boxes.clone(),
            wastes,
        })
    }

    fn notice(&self, purchase_id: i32, supplier_id: i32) -> Option<SupplierNotice> {
        if self.boxes.is_empty() && self.wastes.is_empty() {
            return None;
        }
        Some(SupplierNotice {
            purchase_id,
            supplier_id,
            boxes: self.boxes.clone(),
            wastes: self
                .wastes
                .iter()
                .map(|((product_id, kind), qtt)| WasteLine {
                    product_id: *product_id,
                    kind: kind.clone(),
                    qtt: *qtt,
                })
                .collect(),
        })
    }
}

impl Engine {
    /// Book a delivery with at least one product line and one box line.
    ///
    /// `total` is Σ price × (capacity × qtt + qtt_unite). Fails with
    /// `InsufficientStock` if the warehouse does not hold the empty boxes or
    /// the waste being handed back.
    pub async fn create_purchase(&self, cmd: PurchaseCmd) -> ResultEngine<PurchaseDetail> {
        if cmd.products.is_empty() {
            return Err(EngineError::InvalidInput(
                "purchase needs at least one product line".to_string(),
            ));
        }
        if cmd.boxes.is_empty() {
            return Err(EngineError::InvalidInput(
                "purchase needs at least one box line".to_string(),
            ));
        }
        let lines = PurchaseLines::validate(&cmd)?;
        self.record_purchase(&cmd, lines).await
    }

    /// Book a box and waste exchange with no products; the total stays zero.
    pub async fn create_box_waste_purchase(&self, cmd: PurchaseCmd) -> ResultEngine<PurchaseDetail> {
        if !cmd.products.is_empty() {
            return Err(EngineError::InvalidInput(
                "box and waste purchase cannot carry products".to_string(),
            ));
        }
        if cmd.boxes.is_empty() && cmd.wastes.is_empty() {
            return Err(EngineError::InvalidInput(
                "purchase needs at least one box or waste line".to_string(),
            ));
        }
        let lines = PurchaseLines::validate(&cmd)?;
        self.record_purchase(&cmd, lines).await
    }

    pub async fn purchase(&self, id: i32) -> ResultEngine<PurchaseDetail> {
        with_tx!(self, |db_tx| {
            let model = self.require_purchase(&db_tx, id).await?;
            self.load_purchase_detail(&db_tx, model).await
        })
    }

    /// Forward boxes and waste of a recorded purchase to its supplier again.
    ///
    /// Every given line must match a line of the purchase exactly.
    pub async fn send_to_supplier(
        &self,
        purchase_id: i32,
        boxes: Vec<PurchaseBoxLine>,
        wastes: Vec<WasteLine>,
    ) -> ResultEngine<SupplierNotice> {
        if boxes.is_empty() && wastes.is_empty() {
            return Err(EngineError::InvalidInput(
                "nothing to send to the supplier".to_string(),
            ));
        }
        let detail = with_tx!(self, |db_tx| {
            let model = self.require_purchase(&db_tx, purchase_id).await?;
            self.load_purchase_detail(&db_tx, model).await
        })?;

        for line in &boxes {
            let recorded = detail.boxes.iter().any(|row| {
                row.box_id == line.box_id && row.qtt_in == line.qtt_in && row.qtt_out == line.qtt_out
            });
            if !recorded {
                return Err(EngineError::InvalidInput(format!(
                    "box {} does not match purchase {purchase_id}",
                    line.box_id
                )));
            }
        }
        for line in &wastes {
            let recorded = detail.wastes.iter().any(|row| {
                row.product_id == line.product_id
                    && row.kind == line.kind.trim()
                    && row.qtt == line.qtt
            });
            if !recorded {
                return Err(EngineError::InvalidInput(format!(
                    "waste {}/{} does not match purchase {purchase_id}",
                    line.product_id, line.kind
                )));
            }
        }

        let notice = SupplierNotice {
            purchase_id,
            supplier_id: detail.purchase.supplier_id,
            boxes,
            wastes,
        };
        self.dispatch_notice(&notice);
        Ok(notice)
    }

    async fn record_purchase(
        &self,
        cmd: &PurchaseCmd,
        lines: PurchaseLines,
    ) -> ResultEngine<PurchaseDetail> {
        let detail = with_tx!(self, |db_tx| {
            self.require_supplier(&db_tx, cmd.supplier_id).await?;
            let header = purchases::ActiveModel {
                id: ActiveValue::NotSet,
                supplier_id: ActiveValue::Set(cmd.supplier_id),
                date: ActiveValue::Set(cmd.date),
                total: ActiveValue::Set(0),
            }
            .insert(&db_tx)
            .await?;

            let mut total = Money::ZERO;
            for line in lines.products.values() {
                let product = self.require_product(&db_tx, line.product_id).await?;
                purchase_products::ActiveModel {
                    purchase_id: ActiveValue::Set(header.id),
                    product_id: ActiveValue::Set(line.product_id),
                    qtt: ActiveValue::Set(line.qtt),
                    qtt_unite: ActiveValue::Set(line.qtt_unite),
                    price: ActiveValue::Set(line.price.cents()),
                }
                .insert(&db_tx)
                .await?;
                let units = i64::from(product.capacity_by_box) * i64::from(line.qtt)
                    + i64::from(line.qtt_unite);
                total += line.price.times(units);
                self.release(&db_tx, &StockField::ProductBoxes(line.product_id), line.qtt)
                    .await?;
                self.release(
                    &db_tx,
                    &StockField::ProductUnits(line.product_id),
                    line.qtt_unite,
                )
                .await?;
            }

            for line in &lines.boxes {
                self.require_box(&db_tx, line.box_id).await?;
                purchase_boxes::ActiveModel {
                    id: ActiveValue::NotSet,
                    purchase_id: ActiveValue::Set(header.id),
                    box_id: ActiveValue::Set(line.box_id),
                    qtt_in: ActiveValue::Set(line.qtt_in),
                    qtt_out: ActiveValue::Set(line.qtt_out),
                }
                .insert(&db_tx)
                .await?;
                self.reserve(&db_tx, &StockField::BoxEmpty(line.box_id), line.qtt_out)
                    .await?;
                self.release(&db_tx, &StockField::BoxInStock(line.box_id), line.qtt_in)
                    .await?;
            }

            for ((product_id, kind), qtt) in &lines.wastes {
                let field = StockField::Waste {
                    product_id: *product_id,
                    kind: kind.clone(),
                };
                self.reserve(&db_tx, &field, *qtt).await?;
                purchase_wastes::ActiveModel {
                    purchase_id: ActiveValue::Set(header.id),
                    product_id: ActiveValue::Set(*product_id),
                    kind: ActiveValue::Set(kind.clone()),
                    qtt: ActiveValue::Set(*qtt),
                }
                .insert(&db_tx)
                .await?;
            }

            let header = purchases::ActiveModel {
                id: ActiveValue::Unchanged(header.id),
                total: ActiveValue::Set(total.cents()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            tracing::info!(
                purchase_id = header.id,
                supplier_id = header.supplier_id,
                %total,
                "purchase recorded"
            );
            self.load_purchase_detail(&db_tx, header).await
        })?;

        if let Some(notice) = lines.notice(detail.purchase.id, detail.purchase.supplier_id) {
            self.dispatch_notice(&notice);
        }
        Ok(detail)
    }

    async fn load_purchase_detail(
        &self,
        db: &DatabaseTransaction,
        model: purchases::Model,
    ) -> ResultEngine<PurchaseDetail> {
        let products = model
            .find_related(purchase_products::Entity)
            .order_by_asc(purchase_products::Column::ProductId)
            .all(db)
            .await?;
        let boxes = model
            .find_related(purchase_boxes::Entity)
            .order_by_asc(purchase_boxes::Column::Id)
            .all(db)
            .await?;
        let wastes = model
            .find_related(purchase_wastes::Entity)
            .order_by_asc(purchase_wastes::Column::ProductId)
            .order_by_asc(purchase_wastes::Column::Kind)
            .all(db)
            .await?;
        Ok(PurchaseDetail {
            purchase: model.into(),
            products: products.into_iter().map(Into::into).collect(),
            boxes: boxes.into_iter().map(Into::into).collect(),
            wastes: wastes.into_iter().map(Into::into).collect(),
        })
    }

    fn dispatch_notice(&self, notice: &SupplierNotice) {
        if let Err(err) = self.notifier.notify(notice) {
            tracing::warn!(
                purchase_id = notice.purchase_id,
                supplier_id = notice.supplier_id,
                error = %err,
                "supplier notice failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn duplicate_product_lines_are_rejected() {
        let cmd = PurchaseCmd::new(1, date())
            .product(3, 2, 0, Money::new(100))
            .product(3, 1, 0, Money::new(100))
            .box_line(1, 2, 0);
        assert_eq!(
            PurchaseLines::validate(&cmd).unwrap_err(),
            EngineError::InvalidInput("product 3 listed twice".to_string())
        );
    }

    #[test]
    fn duplicate_waste_lines_are_rejected() {
        let cmd = PurchaseCmd::new(1, date())
            .box_line(1, 0, 2)
            .waste(3, "broken", 1)
            .waste(3, "broken ", 2);
        assert!(matches!(
            PurchaseLines::validate(&cmd),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn price_must_be_positive() {
        let cmd = PurchaseCmd::new(1, date())
            .product(3, 2, 0, Money::ZERO)
            .box_line(1, 2, 0);
        assert!(matches!(
            PurchaseLines::validate(&cmd),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn notice_only_when_something_goes_back() {
        let products_only = PurchaseCmd::new(1, date()).product(3, 2, 0, Money::new(100));
        let lines = PurchaseLines::validate(&products_only).unwrap();
        assert!(lines.notice(7, 1).is_none());

        let with_boxes = products_only.box_line(1, 0, 4);
        let lines = PurchaseLines::validate(&with_boxes).unwrap();
        let notice = lines.notice(7, 1).unwrap();
        assert_eq!(notice.purchase_id, 7);
        assert_eq!(notice.boxes.len(), 1);
    }
}
