use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a recorded payment
pub type PaymentId = Uuid;

/// installment plan variants
///
/// Daily plans repay a fixed amount every calendar day and charge no
/// interest; monthly plans repay principal plus flat interest in equal
/// monthly installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentKind {
    Daily,
    Monthly,
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// repaying on schedule
    Active,
    /// fully collected
    Completed,
    /// due date passed with the balance uncollected
    Overdue,
    /// manual hold, entered and exited only by explicit action
    Paused,
}

impl LoanStatus {
    /// settled loans accept no further lifecycle transitions
    pub fn is_settled(&self) -> bool {
        matches!(self, LoanStatus::Completed)
    }

    /// counted by the portfolio due-today and overdue views
    pub fn is_collectible(&self) -> bool {
        matches!(self, LoanStatus::Active)
    }
}

/// how a payment was tendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Upi,
    BankTransfer,
}
