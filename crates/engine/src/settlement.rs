//! Settlement arithmetic shared by trip close and payroll.
//!
//! Everything here is pure: callers load the rows, these functions turn
//! them into amounts.

use crate::{Money, Role};

/// Units sold on a product line: dispatched minus returned, boxes converted
/// with `capacity_by_box`.
pub(crate) fn sold_units(
    capacity_by_box: i32,
    qtt_out: i32,
    qtt_out_unite: i32,
    qtt_reutour: i32,
    qtt_reutour_unite: i32,
) -> i64 {
    let cap = i64::from(capacity_by_box);
    let out = cap * i64::from(qtt_out) + i64::from(qtt_out_unite);
    let back = cap * i64::from(qtt_reutour) + i64::from(qtt_reutour_unite);
    out - back
}

/// Financial outcome of a closed trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TripFigures {
    pub waited: Money,
    pub received: Money,
    pub benefit: Money,
    pub deff: Money,
}

impl TripFigures {
    pub(crate) fn settle(waited: Money, received: Money, charges: Money, waste_cost: Money) -> Self {
        Self {
            waited,
            received,
            benefit: received - charges,
            deff: received - waited + charges + waste_cost,
        }
    }
}

/// One closed trip as payroll sees it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TripTotals {
    pub waited: Money,
    pub received: Money,
    pub deff: Money,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PayFigures {
    pub total: Money,
    pub credit: Money,
    pub net_pay: Money,
}

/// Monthly pay for an employee.
///
/// Sellers carry the trip variance and earn a commission on the expected
/// amount; drivers and assistants are charged for the gap between cash
/// received and cash expected.
pub(crate) fn monthly_pay(
    role: Role,
    salary_fix: Money,
    trips: &[TripTotals],
    pending_credit: Money,
    commission_per_mille: i64,
) -> PayFigures {
    let (credit, net_pay) = match role {
        Role::Seller => {
            let credit = trips.iter().map(|t| t.deff).sum::<Money>() + pending_credit;
            let waited: Money = trips.iter().map(|t| t.waited).sum();
            let commission = waited.per_mille(commission_per_mille);
            (credit, salary_fix + commission + credit)
        }
        Role::Driver | Role::Assistant => {
            let credit = trips
                .iter()
                .map(|t| t.received - t.waited)
                .sum::<Money>()
                + pending_credit;
            (credit, salary_fix - credit)
        }
    };
    PayFigures {
        total: salary_fix,
        credit,
        net_pay,
    }
}
