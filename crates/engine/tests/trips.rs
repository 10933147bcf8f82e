mod common;

use common::{ASSISTANT, DRIVER, SELLER, TRUCK, day, depot, depot_with};
use engine::{
    CloseTripCmd, EngineError, EngineSettings, ErrorKind, Money, OpenTripCmd, SentDriftPolicy,
    TransferCmd,
};

fn open_cmd(truck: &str) -> OpenTripCmd {
    OpenTripCmd::new(truck, DRIVER, SELLER, day(3, 2), "north").assistant(ASSISTANT)
}

#[tokio::test]
async fn open_trip_reserves_stock() {
    let depot = depot().await;
    let engine = &depot.engine;

    let detail = engine
        .open_trip(
            open_cmd(TRUCK)
                .product(depot.product, 3, 0)
                .box_line(depot.crate_box, 3),
        )
        .await
        .unwrap();

    assert!(detail.trip.is_active);
    assert_eq!(detail.product(depot.product).unwrap().qtt_out, 3);
    assert_eq!(detail.box_line(depot.crate_box).unwrap().qtt_out, 3);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 2);
    let crate_box = engine.returnable_box(depot.crate_box).await.unwrap();
    assert_eq!(crate_box.in_stock, 17);
    assert_eq!(crate_box.sent, 3);
}

#[tokio::test]
async fn second_open_trip_for_a_truck_conflicts() {
    let depot = depot().await;
    let engine = &depot.engine;

    engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 1, 0))
        .await
        .unwrap();
    let err = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 1, 0))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 4);
    assert_eq!(engine.active_trips().await.unwrap().len(), 1);
}

#[tokio::test]
async fn open_trip_never_drives_stock_negative() {
    let depot = depot().await;
    let engine = &depot.engine;

    let err = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 6, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InsufficientStock(_)));
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 5);
    assert!(engine.active_trip(TRUCK).await.unwrap().is_none());
}

#[tokio::test]
async fn open_trip_requires_known_crew() {
    let depot = depot().await;

    let err = depot
        .engine
        .open_trip(OpenTripCmd::new(TRUCK, "nobody", SELLER, day(3, 2), "north"))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("employee nobody".to_string()));
}

#[tokio::test]
async fn five_boxes_one_returned_expects_192() {
    let depot = depot().await;
    let engine = &depot.engine;

    let opened = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 5, 0))
        .await
        .unwrap();
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 0);

    let closed = engine
        .close_trip(CloseTripCmd::new(opened.trip.id, Money::new(192_00)).product(depot.product, 1, 0))
        .await
        .unwrap();

    assert!(!closed.trip.is_active);
    assert_eq!(closed.product(depot.product).unwrap().qtt_vendu, 96);
    assert_eq!(closed.trip.waited_amount.to_string(), "192.00");
    assert_eq!(closed.trip.benefit, Money::new(192_00));
    assert_eq!(closed.trip.deff, Money::ZERO);
}

#[tokio::test]
async fn close_books_charges_and_waste() {
    let depot = depot().await;
    let engine = &depot.engine;

    let opened = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 5, 0))
        .await
        .unwrap();
    let closed = engine
        .close_trip(
            CloseTripCmd::new(opened.trip.id, Money::new(180_00))
                .product(depot.product, 1, 0)
                .waste(depot.product, "broken", 2)
                .charge("fuel", Money::new(10_00)),
        )
        .await
        .unwrap();

    assert_eq!(closed.trip.waited_amount, Money::new(192_00));
    assert_eq!(closed.trip.benefit, Money::new(170_00));
    // 180 - 192 + 10 + 2 broken units at 2.00
    assert_eq!(closed.trip.deff, Money::new(2_00));
    assert_eq!(closed.charges.len(), 1);
    assert_eq!(closed.charges[0].kind, "fuel");
    assert_eq!(closed.charges[0].date, day(3, 2));
    assert_eq!(closed.wastes.len(), 1);
    assert_eq!(
        engine
            .waste_balance(depot.product, "broken")
            .await
            .unwrap()
            .qtt,
        2
    );
}

#[tokio::test]
async fn unreported_lines_count_as_returned() {
    let depot = depot().await;
    let engine = &depot.engine;

    let opened = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 5, 0))
        .await
        .unwrap();
    let closed = engine
        .close_trip(CloseTripCmd::new(opened.trip.id, Money::ZERO))
        .await
        .unwrap();

    let line = closed.product(depot.product).unwrap();
    assert_eq!(line.qtt_reutour, 5);
    assert_eq!(line.qtt_vendu, 0);
    assert_eq!(closed.trip.waited_amount, Money::ZERO);
}

#[tokio::test]
async fn over_return_is_rejected_and_rolled_back() {
    let depot = depot().await;
    let engine = &depot.engine;

    let opened = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 5, 0))
        .await
        .unwrap();
    let err = engine
        .close_trip(CloseTripCmd::new(opened.trip.id, Money::ZERO).product(depot.product, 6, 0))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BadRequest);
    let still_open = engine.active_trip(TRUCK).await.unwrap().unwrap();
    assert_eq!(still_open.trip.id, opened.trip.id);
    assert_eq!(still_open.product(depot.product).unwrap().qtt_reutour, 0);
}

#[tokio::test]
async fn returning_an_unknown_product_is_not_found() {
    let depot = depot().await;
    let engine = &depot.engine;

    let opened = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 1, 0))
        .await
        .unwrap();
    let err = engine
        .close_trip(CloseTripCmd::new(opened.trip.id, Money::ZERO).product(999, 1, 0))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn a_trip_closes_once() {
    let depot = depot().await;
    let engine = &depot.engine;

    let opened = engine.open_trip(open_cmd(TRUCK)).await.unwrap();
    engine
        .close_trip(CloseTripCmd::new(opened.trip.id, Money::ZERO))
        .await
        .unwrap();
    let err = engine
        .close_trip(CloseTripCmd::new(opened.trip.id, Money::ZERO))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::TripClosed(format!("trip {}", opened.trip.id)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn residual_is_carried_to_the_next_trip() {
    let depot = depot().await;
    let engine = &depot.engine;

    let first = engine
        .open_trip(
            open_cmd(TRUCK)
                .product(depot.product, 5, 0)
                .box_line(depot.crate_box, 3),
        )
        .await
        .unwrap();
    engine
        .close_trip(
            CloseTripCmd::new(first.trip.id, Money::new(144_00))
                .product(depot.product, 2, 0)
                .box_line(depot.crate_box, 3),
        )
        .await
        .unwrap();
    let crate_box = engine.returnable_box(depot.crate_box).await.unwrap();
    assert_eq!((crate_box.empty, crate_box.sent), (8, 0));

    let second = engine
        .open_trip(OpenTripCmd::new(TRUCK, DRIVER, SELLER, day(3, 3), "north"))
        .await
        .unwrap();

    assert_eq!(second.product(depot.product).unwrap().qtt_out, 2);
    assert_eq!(second.box_line(depot.crate_box).unwrap().qtt_out, 3);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 0);
    assert_eq!(
        engine.returnable_box(depot.crate_box).await.unwrap().in_stock,
        17
    );
    let previous = engine.previous_trip(second.trip.id).await.unwrap().unwrap();
    assert_eq!(previous.trip.id, first.trip.id);
}

#[tokio::test]
async fn trip_cannot_be_dated_before_the_last_closed_one() {
    let depot = depot().await;
    let engine = &depot.engine;

    let first = engine
        .open_trip(
            OpenTripCmd::new(TRUCK, DRIVER, SELLER, day(3, 10), "north")
                .product(depot.product, 3, 0),
        )
        .await
        .unwrap();
    engine
        .close_trip(CloseTripCmd::new(first.trip.id, Money::new(48_00)).product(depot.product, 2, 0))
        .await
        .unwrap();

    let err = engine
        .open_trip(OpenTripCmd::new(TRUCK, DRIVER, SELLER, day(3, 5), "north"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(engine.active_trip(TRUCK).await.unwrap().is_none());

    // The residual is still available exactly once.
    let emptied = engine.empty_truck(TRUCK).await.unwrap();
    assert_eq!(emptied.trip.id, first.trip.id);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 4);
    let next = engine
        .open_trip(OpenTripCmd::new(TRUCK, DRIVER, SELLER, day(3, 10), "north"))
        .await
        .unwrap();
    assert!(next.products.is_empty());
}

#[tokio::test]
async fn empty_truck_restores_the_warehouse_once() {
    let depot = depot().await;
    let engine = &depot.engine;

    let opened = engine
        .open_trip(
            open_cmd(TRUCK)
                .product(depot.product, 5, 0)
                .box_line(depot.crate_box, 3),
        )
        .await
        .unwrap();
    engine
        .close_trip(
            CloseTripCmd::new(opened.trip.id, Money::new(96_00))
                .product(depot.product, 3, 0)
                .box_line(depot.crate_box, 3),
        )
        .await
        .unwrap();

    let emptied = engine.empty_truck(TRUCK).await.unwrap();
    assert_eq!(emptied.product(depot.product).unwrap().qtt_reutour, 0);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 3);
    let crate_box = engine.returnable_box(depot.crate_box).await.unwrap();
    // The three crates brought back count again in every box counter.
    assert_eq!(
        (crate_box.in_stock, crate_box.empty, crate_box.sent),
        (20, 11, 3)
    );

    engine.empty_truck(TRUCK).await.unwrap();
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 3);
    let crate_box = engine.returnable_box(depot.crate_box).await.unwrap();
    assert_eq!(
        (crate_box.in_stock, crate_box.empty, crate_box.sent),
        (20, 11, 3)
    );

    let next = engine.open_trip(open_cmd(TRUCK)).await.unwrap();
    assert!(next.products.is_empty());
    assert!(next.boxes.is_empty());
}

#[tokio::test]
async fn empty_truck_needs_a_parked_truck() {
    let depot = depot().await;
    let engine = &depot.engine;

    let err = engine.empty_truck(TRUCK).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    engine.open_trip(open_cmd(TRUCK)).await.unwrap();
    let err = engine.empty_truck(TRUCK).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn transfer_moves_the_unreturned_load() {
    let depot = depot().await;
    let engine = &depot.engine;
    engine.new_truck("TR-200", 40).await.unwrap();

    let source = engine
        .open_trip(
            open_cmd(TRUCK)
                .product(depot.product, 3, 0)
                .box_line(depot.crate_box, 2),
        )
        .await
        .unwrap();
    let destination = engine
        .open_trip(open_cmd("TR-200").product(depot.product, 1, 0))
        .await
        .unwrap();

    let moved = engine
        .transfer_products(
            TransferCmd::new(source.trip.id, destination.trip.id)
                .product(depot.product, 1, 0)
                .box_line(depot.crate_box, 0),
        )
        .await
        .unwrap();

    assert_eq!(moved.trip.id, destination.trip.id);
    assert_eq!(moved.product(depot.product).unwrap().qtt_out, 5);
    assert_eq!(moved.box_line(depot.crate_box).unwrap().qtt_out, 2);
    assert_eq!(engine.product(depot.product).await.unwrap().stock, 1);
    let source_after = engine.trip(source.trip.id).await.unwrap();
    assert_eq!(source_after.product(depot.product).unwrap().qtt_out, 3);
}

#[tokio::test]
async fn transfer_rejects_bad_endpoints() {
    let depot = depot().await;
    let engine = &depot.engine;
    engine.new_truck("TR-200", 40).await.unwrap();

    let source = engine
        .open_trip(open_cmd(TRUCK).product(depot.product, 2, 0))
        .await
        .unwrap();
    let err = engine
        .transfer_products(TransferCmd::new(source.trip.id, source.trip.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let destination = engine.open_trip(open_cmd("TR-200")).await.unwrap();
    engine
        .close_trip(CloseTripCmd::new(destination.trip.id, Money::ZERO))
        .await
        .unwrap();
    let err = engine
        .transfer_products(
            TransferCmd::new(source.trip.id, destination.trip.id).product(depot.product, 0, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::TripClosed(_)));
}

async fn close_carried_boxes(policy: SentDriftPolicy) -> Result<(), EngineError> {
    let depot = depot_with(
        EngineSettings {
            sent_drift: policy,
            ..EngineSettings::default()
        },
        None,
    )
    .await;
    let engine = &depot.engine;

    let first = engine
        .open_trip(open_cmd(TRUCK).box_line(depot.crate_box, 3))
        .await?;
    engine
        .close_trip(CloseTripCmd::new(first.trip.id, Money::ZERO).box_line(depot.crate_box, 3))
        .await?;
    // The carried boxes were never counted as sent again.
    let second = engine.open_trip(open_cmd(TRUCK)).await?;
    engine
        .close_trip(CloseTripCmd::new(second.trip.id, Money::ZERO).box_line(depot.crate_box, 3))
        .await?;
    assert_eq!(engine.returnable_box(depot.crate_box).await?.sent, 0);
    Ok(())
}

#[tokio::test]
async fn sent_drift_is_floored_when_tolerated() {
    close_carried_boxes(SentDriftPolicy::Tolerate).await.unwrap();
}

#[tokio::test]
async fn sent_drift_fails_when_strict() {
    let err = close_carried_boxes(SentDriftPolicy::Strict)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));
}
