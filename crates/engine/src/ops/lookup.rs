use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, ResultEngine, boxes, employees, payments, products, purchases, suppliers, trips,
    trucks,
};

use super::Engine;

/// Generates a `require_*` method that loads a row by primary key or fails
/// with `KeyNotFound` naming the key.
macro_rules! impl_require {
    ($require_fn:ident, $entity:ty, $model:ty, $key:ty, $label:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            key: $key,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(key)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("{} {}", $label, key)))
        }
    };
}

impl Engine {
    impl_require!(require_product, products::Entity, products::Model, i32, "product");
    impl_require!(require_box, boxes::Entity, boxes::Model, i32, "box");
    impl_require!(require_trip, trips::Entity, trips::Model, i32, "trip");
    impl_require!(require_supplier, suppliers::Entity, suppliers::Model, i32, "supplier");
    impl_require!(require_purchase, purchases::Entity, purchases::Model, i32, "purchase");
    impl_require!(require_payment, payments::Entity, payments::Model, i32, "payment");
    impl_require!(require_truck, trucks::Entity, trucks::Model, &str, "truck");
    impl_require!(require_employee, employees::Entity, employees::Model, &str, "employee");

    /// The open trip of a truck, if any.
    pub(super) async fn find_active_trip(
        &self,
        db: &DatabaseTransaction,
        truck: &str,
    ) -> ResultEngine<Option<trips::Model>> {
        trips::Entity::find()
            .filter(trips::Column::TruckMatricule.eq(truck))
            .filter(trips::Column::IsActive.eq(true))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// The most recently closed trip of a truck, latest date first and the
    /// highest id breaking ties.
    pub(super) async fn find_last_closed_trip(
        &self,
        db: &DatabaseTransaction,
        truck: &str,
    ) -> ResultEngine<Option<trips::Model>> {
        trips::Entity::find()
            .filter(trips::Column::TruckMatricule.eq(truck))
            .filter(trips::Column::IsActive.eq(false))
            .order_by_desc(trips::Column::Date)
            .order_by_desc(trips::Column::Id)
            .one(db)
            .await
            .map_err(Into::into)
    }
}
