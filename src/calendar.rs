//! Due-date advancement.
//!
//! All period arithmetic in the crate goes through this module so daily and
//! monthly plans advance the same way everywhere. Month advancement clamps
//! the day-of-month to the last valid day of the target month: Jan 31 plus
//! one month is Feb 28 (Feb 29 in a leap year), never a rollover into March.

use chrono::{Days, Months, NaiveDate};

use crate::errors::{LedgerError, Result};
use crate::types::InstallmentKind;

/// advance a date by whole calendar days
pub fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| LedgerError::InvalidDate {
            message: format!("{date} plus {days} days is out of range"),
        })
}

/// advance a date by whole calendar months, clamping the day-of-month
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LedgerError::InvalidDate {
            message: format!("{date} plus {months} months is out of range"),
        })
}

/// advance a date by whole installment periods of the given kind
pub fn advance(date: NaiveDate, kind: InstallmentKind, periods: u64) -> Result<NaiveDate> {
    match kind {
        InstallmentKind::Daily => add_days(date, periods),
        InstallmentKind::Monthly => {
            let months = u32::try_from(periods).map_err(|_| LedgerError::InvalidDate {
                message: format!("{periods} months is out of range"),
            })?;
            add_months(date, months)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_days_crosses_month_boundary() {
        assert_eq!(add_days(date(2025, 8, 29), 4).unwrap(), date(2025, 9, 2));
        assert_eq!(add_days(date(2025, 12, 31), 1).unwrap(), date(2026, 1, 1));
    }

    #[test]
    fn test_month_end_clamping() {
        assert_eq!(add_months(date(2025, 1, 31), 1).unwrap(), date(2025, 2, 28));
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_months(date(2025, 3, 31), 1).unwrap(), date(2025, 4, 30));
    }

    #[test]
    fn test_clamped_day_stays_clamped() {
        // once clamped the short day carries forward, it does not snap back
        let feb = add_months(date(2025, 1, 31), 1).unwrap();
        assert_eq!(add_months(feb, 1).unwrap(), date(2025, 3, 28));
    }

    #[test]
    fn test_advance_by_kind() {
        assert_eq!(
            advance(date(2025, 8, 28), InstallmentKind::Daily, 1).unwrap(),
            date(2025, 8, 29)
        );
        assert_eq!(
            advance(date(2025, 8, 28), InstallmentKind::Monthly, 2).unwrap(),
            date(2025, 10, 28)
        );
        assert_eq!(
            advance(date(2025, 8, 28), InstallmentKind::Daily, 0).unwrap(),
            date(2025, 8, 28)
        );
    }
}
