use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::terms::LoanTerms;
use crate::types::{LoanId, LoanStatus};

/// derived repayment position of a single loan
///
/// Produced by `schedule::derive_schedule` at creation and advanced by
/// `payment::apply_payment`, one fold per recorded payment. Installment
/// counts are decimals because a partial payment covers a fractional
/// installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    /// fixed once computed at creation
    pub total_installments: u32,
    /// fixed once computed at creation, stored unrounded
    pub installment_amount: Money,
    pub paid_installments: Decimal,
    pub remaining_installments: Decimal,
    pub collected_amount: Money,
    pub remaining_amount: Money,
    pub next_due_date: NaiveDate,
    pub status: LoanStatus,
}

impl LedgerState {
    /// check the ledger sum invariants against the loan terms
    ///
    /// The money and installment sums must reconcile within one minor
    /// unit, except on the overpaid side where the remaining figure has
    /// been floored at zero. A violation signals a caller bug such as
    /// replaying payments out of order.
    pub fn check_invariants(&self, terms: &LoanTerms) -> Result<()> {
        if self.collected_amount.is_negative() {
            return Err(LedgerError::InconsistentState {
                message: format!("collected amount is negative: {}", self.collected_amount),
            });
        }
        if self.remaining_amount.is_negative() {
            return Err(LedgerError::InconsistentState {
                message: format!("remaining amount is negative: {}", self.remaining_amount),
            });
        }
        if self.paid_installments.is_sign_negative() {
            return Err(LedgerError::InconsistentState {
                message: format!("paid installments is negative: {}", self.paid_installments),
            });
        }

        let payable = terms.total_payable();
        if self.remaining_amount.is_positive() {
            if !(self.collected_amount + self.remaining_amount).approx_eq(payable) {
                return Err(LedgerError::InconsistentState {
                    message: format!(
                        "collected {} + remaining {} does not reconcile with payable {}",
                        self.collected_amount, self.remaining_amount, payable
                    ),
                });
            }
        } else if self.collected_amount + Money::MINOR_UNIT < payable {
            return Err(LedgerError::InconsistentState {
                message: format!(
                    "remaining amount floored at zero but collected {} is short of payable {}",
                    self.collected_amount, payable
                ),
            });
        }

        let total = Decimal::from(self.total_installments);
        let tolerance = Decimal::new(1, 2);
        if self.remaining_installments.is_sign_positive()
            && !self.remaining_installments.is_zero()
        {
            let sum = self.paid_installments + self.remaining_installments;
            if (sum - total).abs() > tolerance {
                return Err(LedgerError::InconsistentState {
                    message: format!(
                        "paid {} + remaining {} installments does not reconcile with total {}",
                        self.paid_installments, self.remaining_installments, total
                    ),
                });
            }
        }

        Ok(())
    }
}

/// point-in-time capture of a ledger state for the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub snapshot_id: Uuid,
    pub loan_id: LoanId,
    pub timestamp: DateTime<Utc>,
    pub state: LedgerState,
    pub trigger: String,
}

impl LedgerSnapshot {
    pub fn capture(
        loan_id: LoanId,
        state: &LedgerState,
        trigger: &str,
        time: &SafeTimeProvider,
    ) -> Self {
        Self {
            snapshot_id: Uuid::new_v4(),
            loan_id,
            timestamp: time.now(),
            state: state.clone(),
            trigger: trigger.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    use crate::decimal::Money;
    use crate::terms::LoanTerms;

    fn terms() -> LoanTerms {
        LoanTerms::monthly(
            Money::from_major(45_000),
            Money::from_major(5_000),
            10,
            NaiveDate::from_ymd_opt(2025, 8, 28).unwrap(),
        )
    }

    fn state() -> LedgerState {
        LedgerState {
            total_installments: 10,
            installment_amount: Money::from_major(5_000),
            paid_installments: dec!(2.2),
            remaining_installments: dec!(7.8),
            collected_amount: Money::from_major(11_000),
            remaining_amount: Money::from_major(39_000),
            next_due_date: NaiveDate::from_ymd_opt(2025, 10, 28).unwrap(),
            status: LoanStatus::Active,
        }
    }

    #[test]
    fn test_consistent_state_passes() {
        assert!(state().check_invariants(&terms()).is_ok());
    }

    #[test]
    fn test_detects_broken_money_sum() {
        let mut bad = state();
        bad.collected_amount = Money::from_major(12_000);
        assert!(matches!(
            bad.check_invariants(&terms()),
            Err(LedgerError::InconsistentState { .. })
        ));
    }

    #[test]
    fn test_detects_broken_installment_sum() {
        let mut bad = state();
        bad.paid_installments = dec!(3.2);
        assert!(matches!(
            bad.check_invariants(&terms()),
            Err(LedgerError::InconsistentState { .. })
        ));
    }

    #[test]
    fn test_overpaid_state_is_consistent() {
        let mut paid_off = state();
        paid_off.collected_amount = Money::from_major(51_000);
        paid_off.remaining_amount = Money::ZERO;
        paid_off.paid_installments = dec!(10.2);
        paid_off.remaining_installments = Decimal::ZERO;
        paid_off.status = LoanStatus::Completed;
        assert!(paid_off.check_invariants(&terms()).is_ok());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 8, 28, 12, 0, 0).unwrap(),
        ));
        let snapshot = LedgerSnapshot::capture(Uuid::new_v4(), &state(), "payment", &time);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state, snapshot.state);
        assert_eq!(restored.trigger, "payment");
        assert_eq!(restored.timestamp, snapshot.timestamp);
    }
}
