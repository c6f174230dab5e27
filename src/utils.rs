use chrono::{Datelike as _, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{consts::{MAX_STORED_AMOUNT, MONEY_SCALE}, error::PayrollError};

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every calendar day in `[start, end]`, both ends inclusive. Empty when `end < start`
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

pub fn count_weekdays(start: NaiveDate, end: NaiveDate) -> i64 {
    days_in_range(start, end)
        .filter(|day| is_weekday(*day))
        .count() as i64
}

/// Human readable period reference, e.g. `PAY-202406`
pub fn period_reference(start: NaiveDate) -> String {
    format!("PAY-{}", start.format("%Y%m"))
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rejects amounts a `numeric(15, 2)` column cannot hold, and negative ones unless `signed`
pub fn validate_amount(field: &'static str, value: Decimal, signed: bool) -> Result<Decimal, PayrollError> {
    if value.abs() > MAX_STORED_AMOUNT || (!signed && value.is_sign_negative() && !value.is_zero()) {
        return Err(PayrollError::ValueOutOfRange { field, value });
    }

    Ok(value)
}
