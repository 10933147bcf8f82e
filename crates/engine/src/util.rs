//! Internal helpers for input validation and store error mapping.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation rejects the same inputs the same way.

use chrono::{Months, NaiveDate};
use sea_orm::{DbErr, SqlErr};

use crate::{EngineError, Money, ResultEngine};

pub(crate) const MIN_YEAR: i32 = 2000;
pub(crate) const MAX_YEAR: i32 = 2100;

/// Reject negative quantities, naming the offending field.
pub(crate) fn ensure_non_negative(qtt: i32, label: &str) -> ResultEngine<()> {
    if qtt < 0 {
        return Err(EngineError::InvalidQuantity(format!(
            "{label} must be >= 0, got {qtt}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive(qtt: i32, label: &str) -> ResultEngine<()> {
    if qtt <= 0 {
        return Err(EngineError::InvalidQuantity(format!(
            "{label} must be > 0, got {qtt}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive_amount(amount: Money, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be > 0, got {amount}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative_amount(amount: Money, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be >= 0, got {amount}"
        )));
    }
    Ok(())
}

/// First and last day of a payroll month.
pub(crate) fn month_bounds(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidInput(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(EngineError::InvalidInput(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid period {month}/{year}")))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid period {month}/{year}")))?;
    Ok((first, last))
}

/// `true` when the store rejected a write because of a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
