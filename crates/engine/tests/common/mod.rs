#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    Engine, EngineSettings, Money, NewBoxCmd, NewEmployeeCmd, NewProductCmd, NewSupplierCmd,
    Role, SupplierNotifier,
};
use migration::MigratorTrait;

pub const TRUCK: &str = "TR-100";
pub const SELLER: &str = "S-1";
pub const DRIVER: &str = "D-1";
pub const ASSISTANT: &str = "A-1";

/// A migrated in-memory store with one of everything.
pub struct Depot {
    pub engine: Engine,
    /// Yogurt: 2.00 a unit, 24 per box, 5 boxes in stock.
    pub product: i32,
    /// Crate: 20 in stock, 5 empty, none sent.
    pub crate_box: i32,
    pub supplier: i32,
}

pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

pub async fn depot() -> Depot {
    depot_with(EngineSettings::default(), None).await
}

pub async fn depot_with(
    settings: EngineSettings,
    notifier: Option<Arc<dyn SupplierNotifier>>,
) -> Depot {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let mut builder = Engine::builder().database(db).settings(settings);
    if let Some(notifier) = notifier {
        builder = builder.notifier(notifier);
    }
    let engine = builder.build().await.unwrap();

    let crate_box = engine
        .new_box(NewBoxCmd::new("Crate", "plastic").counts(20, 5, 0))
        .await
        .unwrap();
    let product = engine
        .new_product(
            NewProductCmd::new("Yogurt", Money::new(2_00), 24)
                .genre("dairy")
                .stock(5, 0)
                .box_id(crate_box.id),
        )
        .await
        .unwrap();
    engine.new_truck(TRUCK, 40).await.unwrap();
    for (cin, role, salary) in [
        (SELLER, Role::Seller, 3_000_00),
        (DRIVER, Role::Driver, 2_500_00),
        (ASSISTANT, Role::Assistant, 2_000_00),
    ] {
        engine
            .new_employee(NewEmployeeCmd::new(cin, cin, role, Money::new(salary)))
            .await
            .unwrap();
    }
    let supplier = engine
        .new_supplier(NewSupplierCmd::new("Dairy Co").tel("0522000000"))
        .await
        .unwrap();

    Depot {
        engine,
        product: product.id,
        crate_box: crate_box.id,
        supplier: supplier.id,
    }
}
