use thiserror::Error;

use crate::decimal::Money;
use crate::types::PaymentId;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid terms: {message}")]
    InvalidTerms {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    /// reserved: overpayment is accepted and floors the remaining
    /// balance at zero, so this variant is never constructed today
    #[error("payment exceeds amount due: remaining {remaining}, provided {provided}")]
    PaymentExceedsDue {
        remaining: Money,
        provided: Money,
    },

    #[error("inconsistent ledger state: {message}")]
    InconsistentState {
        message: String,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: PaymentId,
    },

    #[error("invalid state: current {current}, expected {expected}")]
    InvalidState {
        current: String,
        expected: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
