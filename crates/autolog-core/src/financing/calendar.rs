//! Month arithmetic for due dates.

use chrono::{Datelike, Months, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// `day` in the given month, clamped to the month's last day
/// (31 in February lands on the 28th or 29th).
pub fn due_date_in_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let clamped = day.clamp(1, last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, clamped)
}

/// Move `date` onto the payment day of its own month.
pub fn align_to_payment_day(date: NaiveDate, payment_day: u32) -> Option<NaiveDate> {
    if date.day() == payment_day {
        return Some(date);
    }
    due_date_in_month(date.year(), date.month(), payment_day)
}

/// The payment day in the month after `date`. Clamping is reapplied from
/// the configured day each time, so a 31st due date returns to the 31st
/// after passing through a short month.
pub fn next_due_date(date: NaiveDate, payment_day: u32) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    let next = first.checked_add_months(Months::new(1))?;
    due_date_in_month(next.year(), next.month(), payment_day)
}

/// Calendar month key used to decide whether a month is already paid.
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
