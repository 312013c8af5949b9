use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, PaymentId};

/// audit trail entries emitted by the loan facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanOpened {
        loan_id: LoanId,
        principal: Money,
        total_installments: u32,
        installment_amount: Money,
        first_due_date: NaiveDate,
    },
    PaymentReceived {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        installments_covered: Decimal,
        timestamp: DateTime<Utc>,
    },
    PaymentDeleted {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    LoanCompleted {
        loan_id: LoanId,
        total_collected: Money,
        timestamp: DateTime<Utc>,
    },
    LoanMarkedOverdue {
        loan_id: LoanId,
        due_date: NaiveDate,
    },
    LoanPaused {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanResumed {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
}

/// append-only event buffer, drained by the persistence collaborator
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// drain the buffer, handing ownership to the caller
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
