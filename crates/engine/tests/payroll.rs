mod common;

use common::{ASSISTANT, DRIVER, Depot, SELLER, TRUCK, day, depot};
use engine::{
    CloseTripCmd, EngineError, ErrorKind, Money, OpenTripCmd, PaymentCmd, PaymentStatus,
};

/// Five boxes out, one back, 190.00 collected against 192.00 expected.
async fn run_march_trip(depot: &Depot) {
    let opened = depot
        .engine
        .open_trip(
            OpenTripCmd::new(TRUCK, DRIVER, SELLER, day(3, 10), "south")
                .assistant(ASSISTANT)
                .product(depot.product, 5, 0),
        )
        .await
        .unwrap();
    depot
        .engine
        .close_trip(CloseTripCmd::new(opened.trip.id, Money::new(190_00)).product(depot.product, 1, 0))
        .await
        .unwrap();
}

#[tokio::test]
async fn seller_carries_variance_and_commission() {
    let depot = depot().await;
    run_march_trip(&depot).await;

    let payment = depot
        .engine
        .create_employee_payment(PaymentCmd::new(SELLER, 3, 2026))
        .await
        .unwrap();

    assert_eq!(payment.total, Money::new(3_000_00));
    assert_eq!(payment.credit, Money::new(-2_00));
    // 0.8 % of 192.00 is 1.536, rounded to 1.54
    assert_eq!(payment.net_pay, Money::new(3_000_00 + 1_54 - 2_00));
    assert_eq!(payment.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn crew_is_charged_the_cash_gap() {
    let depot = depot().await;
    run_march_trip(&depot).await;

    let driver = depot
        .engine
        .create_employee_payment(PaymentCmd::new(DRIVER, 3, 2026))
        .await
        .unwrap();
    assert_eq!(driver.credit, Money::new(-2_00));
    assert_eq!(driver.net_pay, Money::new(2_502_00));

    let assistant = depot
        .engine
        .create_employee_payment(PaymentCmd::new(ASSISTANT, 3, 2026))
        .await
        .unwrap();
    assert_eq!(assistant.net_pay, Money::new(2_002_00));
}

#[tokio::test]
async fn trips_outside_the_month_or_still_open_do_not_count() {
    let depot = depot().await;
    run_march_trip(&depot).await;
    depot
        .engine
        .open_trip(OpenTripCmd::new(TRUCK, DRIVER, SELLER, day(4, 2), "south"))
        .await
        .unwrap();

    let april = depot
        .engine
        .create_employee_payment(PaymentCmd::new(SELLER, 4, 2026).status(PaymentStatus::Paid))
        .await
        .unwrap();
    assert_eq!(april.credit, Money::ZERO);
    assert_eq!(april.net_pay, Money::new(3_000_00));
}

#[tokio::test]
async fn pending_credit_rolls_into_the_next_payment() {
    let depot = depot().await;
    let engine = &depot.engine;
    run_march_trip(&depot).await;

    let march = engine
        .create_employee_payment(PaymentCmd::new(DRIVER, 3, 2026))
        .await
        .unwrap();
    let april = engine
        .create_employee_payment(PaymentCmd::new(DRIVER, 4, 2026))
        .await
        .unwrap();
    assert_eq!(april.credit, march.credit);
    assert_eq!(april.net_pay, Money::new(2_502_00));

    engine
        .update_payment_status(march.id, PaymentStatus::Paid)
        .await
        .unwrap();
    engine
        .update_payment_status(april.id, PaymentStatus::Paid)
        .await
        .unwrap();
    let may = engine
        .create_employee_payment(PaymentCmd::new(DRIVER, 5, 2026))
        .await
        .unwrap();
    assert_eq!(may.credit, Money::ZERO);

    let history = engine.payments_for_employee(DRIVER).await.unwrap();
    let months: Vec<u32> = history.iter().map(|p| p.month).collect();
    assert_eq!(months, vec![5, 4, 3]);
    assert_eq!(
        engine.payment(march.id).await.unwrap().status,
        PaymentStatus::Paid
    );
}

#[tokio::test]
async fn one_payment_per_period() {
    let depot = depot().await;
    let engine = &depot.engine;

    engine
        .create_employee_payment(PaymentCmd::new(SELLER, 3, 2026))
        .await
        .unwrap();
    let err = engine
        .create_employee_payment(PaymentCmd::new(SELLER, 3, 2026))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::ExistingKey(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn payment_period_and_employee_are_validated() {
    let depot = depot().await;
    let engine = &depot.engine;

    let err = engine
        .create_employee_payment(PaymentCmd::new(SELLER, 13, 2026))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let err = engine
        .create_employee_payment(PaymentCmd::new(SELLER, 1, 1999))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let err = engine
        .create_employee_payment(PaymentCmd::new("ghost", 3, 2026))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("employee ghost".to_string()));
}
