//! Payment application.
//!
//! `apply_payment` is the single place a payment folds into a ledger
//! state; the loan facade, history replay, and any caller recording a
//! collection all go through it rather than recomputing inline.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::ledger::LedgerState;
use crate::schedule::derive_schedule;
use crate::terms::LoanTerms;
use crate::types::{LoanStatus, PaymentId, PaymentMethod};

/// a collected payment, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: PaymentId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub note: Option<String>,
}

impl PaymentRecord {
    pub fn new(amount: Money, payment_date: NaiveDate, method: PaymentMethod) -> Self {
        Self {
            payment_id: Uuid::new_v4(),
            amount,
            payment_date,
            method,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// fold one payment into a ledger state
///
/// A payment covers `amount / installment_amount` installments,
/// fractionally; the next due date advances by the whole installments
/// covered, a fractional remainder never advances an extra period.
/// Overpayment is accepted and floors the remaining balance at zero.
/// `as_of` is the date the overdue test is evaluated against.
///
/// Status resolution, first match wins: the balance or installments
/// reaching zero completes the loan; a paused loan stays paused; a due
/// date behind `as_of` is overdue; otherwise active. On error the input
/// state is untouched.
pub fn apply_payment(
    state: &LedgerState,
    terms: &LoanTerms,
    payment: &PaymentRecord,
    as_of: NaiveDate,
) -> Result<LedgerState> {
    if !payment.amount.is_positive() {
        return Err(LedgerError::InvalidPaymentAmount {
            amount: payment.amount,
        });
    }
    if !state.installment_amount.is_positive() {
        return Err(LedgerError::InconsistentState {
            message: format!(
                "installment amount must be positive, got {}",
                state.installment_amount
            ),
        });
    }

    let installments_covered =
        payment.amount.as_decimal() / state.installment_amount.as_decimal();

    let collected_amount = state.collected_amount + payment.amount;
    let paid_installments = state.paid_installments + installments_covered;
    let remaining_amount = (terms.total_payable() - collected_amount).max(Money::ZERO);
    let remaining_installments =
        (Decimal::from(state.total_installments) - paid_installments).max(Decimal::ZERO);

    let whole_periods =
        installments_covered
            .floor()
            .to_u64()
            .ok_or_else(|| LedgerError::CalculationError {
                message: format!("installments covered out of range: {installments_covered}"),
            })?;
    let next_due_date =
        calendar::advance(state.next_due_date, terms.installment_kind, whole_periods)?;

    let status = if !remaining_amount.is_positive() || remaining_installments <= Decimal::ZERO {
        LoanStatus::Completed
    } else if state.status == LoanStatus::Paused {
        // manual hold: a payment never auto-resumes, only completion exits
        LoanStatus::Paused
    } else if next_due_date < as_of {
        LoanStatus::Overdue
    } else {
        LoanStatus::Active
    };

    let next = LedgerState {
        total_installments: state.total_installments,
        installment_amount: state.installment_amount,
        paid_installments,
        remaining_installments,
        collected_amount,
        remaining_amount,
        next_due_date,
        status,
    };
    next.check_invariants(terms)?;
    Ok(next)
}

/// rebuild a ledger state from the full payment history
///
/// Used after a payment is deleted: the surviving records replay in
/// payment-date order from a freshly derived schedule, so the ledger can
/// never drift from the sum of its history.
pub fn replay_payments(
    terms: &LoanTerms,
    payments: &[PaymentRecord],
    as_of: NaiveDate,
) -> Result<LedgerState> {
    let mut ordered: Vec<&PaymentRecord> = payments.iter().collect();
    ordered.sort_by_key(|p| p.payment_date);

    let mut state = derive_schedule(terms)?;
    for payment in ordered {
        state = apply_payment(&state, terms, payment, as_of)?;
    }
    Ok(state)
}
