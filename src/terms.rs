use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::InstallmentKind;

/// default per-day installment for daily plans, in major currency units
pub const DEFAULT_DAILY_AMOUNT: i64 = 100;

/// immutable loan contract parameters, fixed at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// loan base amount
    pub principal: Money,
    /// cash actually handed to the borrower; informational, may be
    /// less than principal
    pub disbursed_amount: Money,
    /// flat interest added on top of principal; always zero for daily plans
    pub interest: Money,
    pub installment_kind: InstallmentKind,
    /// installment count for monthly plans; informational for daily plans
    pub duration_months: u32,
    /// calendar date the schedule begins
    pub start_date: NaiveDate,
    /// constant per-day installment for daily plans
    pub fixed_daily_amount: Money,
}

impl LoanTerms {
    /// daily plan: fixed amount per day, no interest charged
    pub fn daily(principal: Money, start_date: NaiveDate) -> Self {
        Self {
            principal,
            disbursed_amount: principal,
            interest: Money::ZERO,
            installment_kind: InstallmentKind::Daily,
            duration_months: 0,
            start_date,
            fixed_daily_amount: Money::from_major(DEFAULT_DAILY_AMOUNT),
        }
    }

    /// monthly plan with a flat interest amount
    pub fn monthly(
        principal: Money,
        interest: Money,
        duration_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            disbursed_amount: principal,
            interest,
            installment_kind: InstallmentKind::Monthly,
            duration_months,
            start_date,
            fixed_daily_amount: Money::from_major(DEFAULT_DAILY_AMOUNT),
        }
    }

    /// monthly plan with interest entered as a percentage of principal,
    /// converted to a flat amount at creation
    pub fn monthly_with_rate(
        principal: Money,
        rate: Rate,
        duration_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self::monthly(principal, rate.of(principal), duration_months, start_date)
    }

    /// override the disbursed amount (deductions held back at disbursal)
    pub fn with_disbursed(mut self, disbursed_amount: Money) -> Self {
        self.disbursed_amount = disbursed_amount;
        self
    }

    /// override the per-day installment for daily plans
    pub fn with_daily_amount(mut self, fixed_daily_amount: Money) -> Self {
        self.fixed_daily_amount = fixed_daily_amount;
        self
    }

    /// total amount the borrower owes over the life of the loan
    pub fn total_payable(&self) -> Money {
        match self.installment_kind {
            InstallmentKind::Daily => self.principal,
            InstallmentKind::Monthly => self.principal + self.interest,
        }
    }

    /// reject terms that cannot produce a schedule
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LedgerError::InvalidTerms {
                message: format!("principal must be positive, got {}", self.principal),
            });
        }
        if self.interest.is_negative() {
            return Err(LedgerError::InvalidTerms {
                message: format!("interest must not be negative, got {}", self.interest),
            });
        }
        match self.installment_kind {
            InstallmentKind::Daily => {
                if !self.fixed_daily_amount.is_positive() {
                    return Err(LedgerError::InvalidTerms {
                        message: format!(
                            "daily installment must be positive, got {}",
                            self.fixed_daily_amount
                        ),
                    });
                }
            }
            InstallmentKind::Monthly => {
                if self.duration_months < 1 {
                    return Err(LedgerError::InvalidTerms {
                        message: "monthly plan requires a duration of at least one month"
                            .to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 28).unwrap()
    }

    #[test]
    fn test_daily_terms_charge_no_interest() {
        let terms = LoanTerms::daily(Money::from_major(10_000), start());
        assert!(terms.validate().is_ok());
        assert_eq!(terms.interest, Money::ZERO);
        assert_eq!(terms.total_payable(), Money::from_major(10_000));
    }

    #[test]
    fn test_monthly_total_payable_includes_interest() {
        let terms = LoanTerms::monthly(
            Money::from_major(45_000),
            Money::from_major(5_000),
            10,
            start(),
        );
        assert!(terms.validate().is_ok());
        assert_eq!(terms.total_payable(), Money::from_major(50_000));
    }

    #[test]
    fn test_rate_entry_converts_to_flat_interest() {
        let flat = LoanTerms::monthly(
            Money::from_major(45_000),
            Money::from_major(4_500),
            10,
            start(),
        );
        let percent = LoanTerms::monthly_with_rate(
            Money::from_major(45_000),
            Rate::from_percentage(10),
            10,
            start(),
        );
        assert_eq!(flat, percent);
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let terms = LoanTerms::daily(Money::ZERO, start());
        assert!(matches!(
            terms.validate(),
            Err(LedgerError::InvalidTerms { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_duration_monthly() {
        let terms = LoanTerms::monthly(Money::from_major(1_000), Money::ZERO, 0, start());
        assert!(matches!(
            terms.validate(),
            Err(LedgerError::InvalidTerms { .. })
        ));
    }

    #[test]
    fn test_disbursed_override() {
        let terms = LoanTerms::monthly(Money::from_major(45_000), Money::from_major(5_000), 10, start())
            .with_disbursed(Money::from_major(44_000));
        assert_eq!(terms.disbursed_amount, Money::from_major(44_000));
        // total payable is unaffected by the disbursed amount
        assert_eq!(terms.total_payable(), Money::from_major(50_000));
    }
}
