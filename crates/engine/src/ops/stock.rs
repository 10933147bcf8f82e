//! Stock accessors.
//!
//! Every warehouse counter (product boxes and loose units, the three box
//! counters, waste balances) is mutated through [`Engine::reserve`],
//! [`Engine::release`] or [`Engine::settle`]. Reservations are applied with a
//! guarded `UPDATE ... WHERE col >= amount`, so a counter can never be
//! driven below zero even by concurrent writers.

use std::fmt;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};
use tracing::{debug, warn};

use crate::{
    EngineError, ResultEngine, SentDriftPolicy, boxes, products, util::ensure_non_negative,
    wastes,
};

use super::Engine;

/// A guarded warehouse counter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StockField {
    /// `Product.stock`, whole boxes.
    ProductBoxes(i32),
    /// `Product.unite_in_stock`, loose units.
    ProductUnits(i32),
    BoxInStock(i32),
    BoxEmpty(i32),
    BoxSent(i32),
    /// Waste balance for `(product, kind)`, created at zero on first use.
    Waste { product_id: i32, kind: String },
}

impl fmt::Display for StockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductBoxes(id) => write!(f, "product {id} stock"),
            Self::ProductUnits(id) => write!(f, "product {id} unite_in_stock"),
            Self::BoxInStock(id) => write!(f, "box {id} in_stock"),
            Self::BoxEmpty(id) => write!(f, "box {id} empty"),
            Self::BoxSent(id) => write!(f, "box {id} sent"),
            Self::Waste { product_id, kind } => write!(f, "waste {product_id}/{kind}"),
        }
    }
}

/// Add `$delta` to `$col` on the rows matching `$filter`, optionally only
/// where the column is at least `$min`. Evaluates to the affected row count.
macro_rules! shift_column {
    ($db:expr, $entity:ty, $col:expr, $filter:expr, $delta:expr, $min:expr) => {{
        let mut update = <$entity>::update_many()
            .col_expr($col, Expr::col($col).add($delta))
            .filter($filter);
        if let Some(min) = $min {
            update = update.filter($col.gte(min));
        }
        update.exec($db).await?.rows_affected
    }};
}

impl Engine {
    /// Take `amount` from a counter.
    ///
    /// Fails with `InsufficientStock` when the counter holds less than
    /// `amount`; the counter is left untouched in that case. Returns the new
    /// balance.
    pub(super) async fn reserve(
        &self,
        db: &DatabaseTransaction,
        field: &StockField,
        amount: i32,
    ) -> ResultEngine<i32> {
        ensure_non_negative(amount, &field.to_string())?;
        self.prepare_counter(db, field).await?;
        if self.shift(db, field, -amount, Some(amount)).await? == 0 {
            let available = self.read_counter(db, field).await?;
            return Err(EngineError::InsufficientStock(format!(
                "{field}: requested {amount}, available {available}"
            )));
        }
        let balance = self.read_counter(db, field).await?;
        debug!(%field, amount, balance, "stock reserved");
        Ok(balance)
    }

    /// Add `amount` to a counter. Returns the new balance.
    pub(super) async fn release(
        &self,
        db: &DatabaseTransaction,
        field: &StockField,
        amount: i32,
    ) -> ResultEngine<i32> {
        ensure_non_negative(amount, &field.to_string())?;
        self.prepare_counter(db, field).await?;
        if self.shift(db, field, amount, None).await? == 0 {
            // No row matched: surface the missing key.
            self.read_counter(db, field).await?;
        }
        let balance = self.read_counter(db, field).await?;
        debug!(%field, amount, balance, "stock released");
        Ok(balance)
    }

    /// Take `amount` from a counter that historical data may have left too
    /// low, applying the configured [`SentDriftPolicy`].
    ///
    /// With `Tolerate` a shortfall floors the counter at zero and logs a
    /// warning; with `Strict` it fails like [`Engine::reserve`].
    pub(super) async fn settle(
        &self,
        db: &DatabaseTransaction,
        field: &StockField,
        amount: i32,
    ) -> ResultEngine<i32> {
        ensure_non_negative(amount, &field.to_string())?;
        let current = self.read_counter(db, field).await?;
        if current >= amount || self.settings.sent_drift == SentDriftPolicy::Strict {
            return self.reserve(db, field, amount).await;
        }
        warn!(
            %field,
            amount,
            current,
            "counter would go negative, flooring at zero"
        );
        self.shift(db, field, -current, None).await?;
        Ok(0)
    }

    /// Decrement `Box.sent` when boxes come back from a truck.
    pub(super) async fn settle_sent(
        &self,
        db: &DatabaseTransaction,
        box_id: i32,
        amount: i32,
    ) -> ResultEngine<i32> {
        self.settle(db, &StockField::BoxSent(box_id), amount).await
    }

    /// Waste rows are created lazily; other counters must already exist.
    async fn prepare_counter(&self, db: &DatabaseTransaction, field: &StockField) -> ResultEngine<()> {
        let StockField::Waste { product_id, kind } = field else {
            return Ok(());
        };
        let existing = wastes::Entity::find_by_id((*product_id, kind.clone()))
            .one(db)
            .await?;
        if existing.is_none() {
            self.require_product(db, *product_id).await?;
            let row = wastes::ActiveModel {
                product_id: ActiveValue::Set(*product_id),
                kind: ActiveValue::Set(kind.clone()),
                qtt: ActiveValue::Set(0),
            };
            row.insert(db).await?;
        }
        Ok(())
    }

    async fn shift(
        &self,
        db: &DatabaseTransaction,
        field: &StockField,
        delta: i32,
        min: Option<i32>,
    ) -> ResultEngine<u64> {
        let affected = match field {
            StockField::ProductBoxes(id) => shift_column!(
                db,
                products::Entity,
                products::Column::Stock,
                products::Column::Id.eq(*id),
                delta,
                min
            ),
            StockField::ProductUnits(id) => shift_column!(
                db,
                products::Entity,
                products::Column::UniteInStock,
                products::Column::Id.eq(*id),
                delta,
                min
            ),
            StockField::BoxInStock(id) => shift_column!(
                db,
                boxes::Entity,
                boxes::Column::InStock,
                boxes::Column::Id.eq(*id),
                delta,
                min
            ),
            StockField::BoxEmpty(id) => shift_column!(
                db,
                boxes::Entity,
                boxes::Column::Empty,
                boxes::Column::Id.eq(*id),
                delta,
                min
            ),
            StockField::BoxSent(id) => shift_column!(
                db,
                boxes::Entity,
                boxes::Column::Sent,
                boxes::Column::Id.eq(*id),
                delta,
                min
            ),
            StockField::Waste { product_id, kind } => shift_column!(
                db,
                wastes::Entity,
                wastes::Column::Qtt,
                wastes::Column::ProductId
                    .eq(*product_id)
                    .and(wastes::Column::Kind.eq(kind.as_str())),
                delta,
                min
            ),
        };
        Ok(affected)
    }

    /// Current value of a counter. A missing waste row reads as zero.
    pub(super) async fn read_counter(
        &self,
        db: &DatabaseTransaction,
        field: &StockField,
    ) -> ResultEngine<i32> {
        let value = match field {
            StockField::ProductBoxes(id) => self.require_product(db, *id).await?.stock,
            StockField::ProductUnits(id) => self.require_product(db, *id).await?.unite_in_stock,
            StockField::BoxInStock(id) => self.require_box(db, *id).await?.in_stock,
            StockField::BoxEmpty(id) => self.require_box(db, *id).await?.empty,
            StockField::BoxSent(id) => self.require_box(db, *id).await?.sent,
            StockField::Waste { product_id, kind } => {
                wastes::Entity::find_by_id((*product_id, kind.clone()))
                    .one(db)
                    .await?
                    .map_or(0, |row| row.qtt)
            }
        };
        Ok(value)
    }
}
