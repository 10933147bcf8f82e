mod common;

use std::sync::{Arc, Mutex};

use common::{day, depot, depot_with};
use engine::{
    EngineError, EngineSettings, ErrorKind, Money, NotifyError, PurchaseBoxLine, PurchaseCmd,
    SupplierNotice, SupplierNotifier, WasteLine,
};

#[derive(Debug, Default)]
struct Recorder {
    notices: Mutex<Vec<SupplierNotice>>,
}

impl SupplierNotifier for Recorder {
    fn notify(&self, notice: &SupplierNotice) -> Result<(), NotifyError> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

#[derive(Debug)]
struct Unreachable;

impl SupplierNotifier for Unreachable {
    fn notify(&self, _notice: &SupplierNotice) -> Result<(), NotifyError> {
        Err("supplier gateway down".into())
    }
}

#[tokio::test]
async fn purchase_totals_units_and_restocks() {
    let depot = depot().await;
    let engine = &depot.engine;

    let detail = engine
        .create_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 5))
                .product(depot.product, 2, 0, Money::new(10_00))
                .box_line(depot.crate_box, 4, 2),
        )
        .await
        .unwrap();

    assert_eq!(detail.purchase.total.to_string(), "480.00");
    assert_eq!(detail.products.len(), 1);
    assert_eq!(detail.boxes.len(), 1);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 7);
    let crate_box = engine.returnable_box(depot.crate_box).await.unwrap();
    assert_eq!((crate_box.in_stock, crate_box.empty), (24, 3));
    assert_eq!(engine.purchase(detail.purchase.id).await.unwrap(), detail);
}

#[tokio::test]
async fn loose_units_add_to_the_total() {
    let depot = depot().await;
    let engine = &depot.engine;

    let detail = engine
        .create_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 5))
                .product(depot.product, 1, 6, Money::new(1_50))
                .box_line(depot.crate_box, 1, 0),
        )
        .await
        .unwrap();

    // (24 + 6) units at 1.50
    assert_eq!(detail.purchase.total, Money::new(45_00));
    assert_eq!(engine.product(depot.product).await.unwrap().unite_in_stock, 6);
}

#[tokio::test]
async fn purchase_needs_products_and_boxes() {
    let depot = depot().await;
    let engine = &depot.engine;

    let no_boxes = PurchaseCmd::new(depot.supplier, day(3, 5)).product(
        depot.product,
        2,
        0,
        Money::new(10_00),
    );
    assert_eq!(
        engine.create_purchase(no_boxes).await.unwrap_err().kind(),
        ErrorKind::BadRequest
    );

    let no_products = PurchaseCmd::new(depot.supplier, day(3, 5)).box_line(depot.crate_box, 1, 0);
    assert_eq!(
        engine.create_purchase(no_products).await.unwrap_err().kind(),
        ErrorKind::BadRequest
    );
}

#[tokio::test]
async fn unknown_supplier_is_not_found() {
    let depot = depot().await;

    let err = depot
        .engine
        .create_purchase(
            PurchaseCmd::new(42, day(3, 5))
                .product(depot.product, 1, 0, Money::new(1_00))
                .box_line(depot.crate_box, 1, 0),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("supplier 42".to_string()));
}

#[tokio::test]
async fn handing_back_missing_empties_rolls_back() {
    let depot = depot().await;
    let engine = &depot.engine;

    let err = engine
        .create_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 5))
                .product(depot.product, 2, 0, Money::new(10_00))
                .box_line(depot.crate_box, 0, 6),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InsufficientStock(_)));
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 5);
    assert_eq!(engine.returnable_box(depot.crate_box).await.unwrap().empty, 5);
}

#[tokio::test]
async fn box_waste_purchase_draws_down_waste() {
    let depot = depot().await;
    let engine = &depot.engine;
    engine
        .record_waste(depot.product, "broken", 3)
        .await
        .unwrap();

    let detail = engine
        .create_box_waste_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 6))
                .box_line(depot.crate_box, 0, 1)
                .waste(depot.product, "broken", 2),
        )
        .await
        .unwrap();

    assert_eq!(detail.purchase.total, Money::ZERO);
    assert_eq!(detail.wastes.len(), 1);
    assert_eq!(
        engine
            .waste_balance(depot.product, "broken")
            .await
            .unwrap()
            .qtt,
        1
    );

    let err = engine
        .create_box_waste_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 7)).waste(depot.product, "broken", 2),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));

    let err = engine
        .create_box_waste_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 7)).product(
                depot.product,
                1,
                0,
                Money::new(1_00),
            ),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[tokio::test]
async fn supplier_is_notified_after_commit() {
    let recorder = Arc::new(Recorder::default());
    let depot = depot_with(EngineSettings::default(), Some(recorder.clone())).await;
    let engine = &depot.engine;

    let detail = engine
        .create_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 5))
                .product(depot.product, 1, 0, Money::new(1_00))
                .box_line(depot.crate_box, 2, 1),
        )
        .await
        .unwrap();
    // A rejected purchase sends nothing.
    engine
        .create_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 5))
                .product(depot.product, 1, 0, Money::new(1_00))
                .box_line(depot.crate_box, 0, 99),
        )
        .await
        .unwrap_err();

    let notices = recorder.notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].purchase_id, detail.purchase.id);
    assert_eq!(
        notices[0].boxes,
        vec![PurchaseBoxLine {
            box_id: depot.crate_box,
            qtt_in: 2,
            qtt_out: 1,
        }]
    );
}

#[tokio::test]
async fn notifier_failure_does_not_fail_the_purchase() {
    let depot = depot_with(EngineSettings::default(), Some(Arc::new(Unreachable))).await;
    let engine = &depot.engine;

    let detail = engine
        .create_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 5))
                .product(depot.product, 1, 0, Money::new(1_00))
                .box_line(depot.crate_box, 0, 1),
        )
        .await
        .unwrap();
    assert_eq!(engine.purchase(detail.purchase.id).await.unwrap(), detail);
}

#[tokio::test]
async fn send_to_supplier_checks_the_recorded_lines() {
    let depot = depot().await;
    let engine = &depot.engine;
    engine
        .record_waste(depot.product, "expired", 4)
        .await
        .unwrap();
    let detail = engine
        .create_purchase(
            PurchaseCmd::new(depot.supplier, day(3, 5))
                .product(depot.product, 1, 0, Money::new(1_00))
                .box_line(depot.crate_box, 0, 2)
                .waste(depot.product, "expired", 4),
        )
        .await
        .unwrap();

    let box_line = PurchaseBoxLine {
        box_id: depot.crate_box,
        qtt_in: 0,
        qtt_out: 2,
    };
    let waste = WasteLine {
        product_id: depot.product,
        kind: "expired".to_string(),
        qtt: 4,
    };
    let notice = engine
        .send_to_supplier(detail.purchase.id, vec![box_line.clone()], vec![waste])
        .await
        .unwrap();
    assert_eq!(notice.supplier_id, depot.supplier);

    let wrong = PurchaseBoxLine {
        qtt_out: 3,
        ..box_line
    };
    let err = engine
        .send_to_supplier(detail.purchase.id, vec![wrong], Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}
