mod common;

use common::{TRUCK, depot};
use engine::{
    EngineError, ErrorKind, Money, NewEmployeeCmd, NewProductCmd, Role,
};

#[tokio::test]
async fn product_designations_are_unique() {
    let depot = depot().await;

    let err = depot
        .engine
        .new_product(NewProductCmd::new(" Yogurt ", Money::new(1_00), 12))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("product Yogurt".to_string()));
}

#[tokio::test]
async fn product_default_box_must_exist() {
    let depot = depot().await;

    let err = depot
        .engine
        .new_product(NewProductCmd::new("Cheese", Money::new(5_00), 6).box_id(77))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("box 77".to_string()));
}

#[tokio::test]
async fn catalog_rejects_bad_input() {
    let depot = depot().await;
    let engine = &depot.engine;

    let err = engine
        .new_product(NewProductCmd::new("Butter", Money::new(-1), 6))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .new_employee(NewEmployeeCmd::new("  ", "Nameless", Role::Driver, Money::ZERO))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let err = engine.new_truck(TRUCK, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn listings_and_lookups() {
    let depot = depot().await;
    let engine = &depot.engine;

    let products = engine.products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].designation, "Yogurt");
    assert_eq!(products[0].box_id, Some(depot.crate_box));
    assert_eq!(engine.boxes().await.unwrap().len(), 1);
    assert_eq!(engine.truck(TRUCK).await.unwrap().capacity, 40);
    assert_eq!(engine.supplier(depot.supplier).await.unwrap().name, "Dairy Co");
    assert_eq!(
        engine.employee(common::SELLER).await.unwrap().role,
        Role::Seller
    );
    assert_eq!(
        engine.product(404).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn manual_waste_accumulates() {
    let depot = depot().await;
    let engine = &depot.engine;

    assert_eq!(
        engine
            .waste_balance(depot.product, "expired")
            .await
            .unwrap()
            .qtt,
        0
    );
    engine
        .record_waste(depot.product, "expired", 2)
        .await
        .unwrap();
    let waste = engine
        .record_waste(depot.product, "expired", 3)
        .await
        .unwrap();
    assert_eq!(waste.qtt, 5);
    assert_eq!(engine.wastes().await.unwrap().len(), 1);

    let err = engine
        .record_waste(depot.product, "expired", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidQuantity(_)));
}
