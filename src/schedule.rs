//! Schedule derivation.
//!
//! Runs once at loan creation and fixes the installment count and amount
//! for the life of the loan.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::calendar;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::ledger::LedgerState;
use crate::terms::LoanTerms;
use crate::types::{InstallmentKind, LoanStatus};

/// derive the initial ledger state from loan terms
///
/// Daily plans repay the fixed per-day amount until the principal is
/// covered: `ceil(principal / fixed_daily_amount)` installments, no
/// interest. Monthly plans split `principal + interest` into
/// `duration_months` equal installments, stored without display rounding.
/// The first due date is the start date advanced by one period.
pub fn derive_schedule(terms: &LoanTerms) -> Result<LedgerState> {
    terms.validate()?;

    let (total_installments, installment_amount) = match terms.installment_kind {
        InstallmentKind::Daily => {
            let count = (terms.principal.as_decimal() / terms.fixed_daily_amount.as_decimal())
                .ceil()
                .to_u32()
                .ok_or_else(|| LedgerError::CalculationError {
                    message: format!(
                        "installment count out of range for principal {}",
                        terms.principal
                    ),
                })?;
            (count, terms.fixed_daily_amount)
        }
        InstallmentKind::Monthly => {
            let amount = terms.total_payable() / Decimal::from(terms.duration_months);
            (terms.duration_months, amount)
        }
    };

    let next_due_date = calendar::advance(terms.start_date, terms.installment_kind, 1)?;

    let state = LedgerState {
        total_installments,
        installment_amount,
        paid_installments: Decimal::ZERO,
        remaining_installments: Decimal::from(total_installments),
        collected_amount: Money::ZERO,
        remaining_amount: terms.total_payable(),
        next_due_date,
        status: LoanStatus::Active,
    };
    state.check_invariants(terms)?;
    Ok(state)
}
