use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::ledger::{LedgerSnapshot, LedgerState};
use crate::payment::{apply_payment, replay_payments, PaymentRecord};
use crate::schedule::derive_schedule;
use crate::terms::LoanTerms;
use crate::types::{LoanId, LoanStatus, PaymentId, PaymentMethod};

/// a loan: immutable terms, the current ledger state, and the
/// append-only payment history that produced it
///
/// All mutation funnels through this facade so every payment goes through
/// the one canonical applicator, every change lands in the audit trail,
/// and deletion always replays the surviving history. Payments against
/// one loan must be serialized by the caller; the fold is not
/// commutative.
#[derive(Debug, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub terms: LoanTerms,
    pub state: LedgerState,
    pub payments: Vec<PaymentRecord>,
    #[serde(skip)]
    pub events: EventStore,
    #[serde(skip)]
    pub snapshots: Vec<LedgerSnapshot>,
}

impl Loan {
    /// open a loan, deriving its initial schedule
    pub fn open(terms: LoanTerms, time: &SafeTimeProvider) -> Result<Self> {
        let state = derive_schedule(&terms)?;
        let id = Uuid::new_v4();

        let mut loan = Self {
            id,
            terms,
            state,
            payments: Vec::new(),
            events: EventStore::new(),
            snapshots: Vec::new(),
        };

        loan.events.emit(Event::LoanOpened {
            loan_id: id,
            principal: loan.terms.principal,
            total_installments: loan.state.total_installments,
            installment_amount: loan.state.installment_amount,
            first_due_date: loan.state.next_due_date,
        });
        loan.snapshots
            .push(LedgerSnapshot::capture(id, &loan.state, "open", time));

        Ok(loan)
    }

    /// record a collected payment, dated today
    pub fn record_payment(
        &mut self,
        amount: Money,
        method: PaymentMethod,
        note: Option<String>,
        time: &SafeTimeProvider,
    ) -> Result<&LedgerState> {
        let today = time.now().date_naive();
        let mut record = PaymentRecord::new(amount, today, method);
        if let Some(note) = note {
            record = record.with_note(note);
        }

        let was_settled = self.state.status.is_settled();
        let next = apply_payment(&self.state, &self.terms, &record, today)?;
        let installments_covered = next.paid_installments - self.state.paid_installments;

        self.events.emit(Event::PaymentReceived {
            loan_id: self.id,
            payment_id: record.payment_id,
            amount,
            installments_covered,
            timestamp: time.now(),
        });
        if next.status.is_settled() && !was_settled {
            self.events.emit(Event::LoanCompleted {
                loan_id: self.id,
                total_collected: next.collected_amount,
                timestamp: time.now(),
            });
        }

        self.payments.push(record);
        self.state = next;
        self.snapshots
            .push(LedgerSnapshot::capture(self.id, &self.state, "payment", time));
        Ok(&self.state)
    }

    /// delete a recorded payment and rebuild the ledger from the
    /// surviving history
    pub fn delete_payment(
        &mut self,
        payment_id: PaymentId,
        time: &SafeTimeProvider,
    ) -> Result<&LedgerState> {
        let index = self
            .payments
            .iter()
            .position(|p| p.payment_id == payment_id)
            .ok_or(LedgerError::PaymentNotFound { id: payment_id })?;

        let removed = self.payments.remove(index);
        let today = time.now().date_naive();
        match replay_payments(&self.terms, &self.payments, today) {
            Ok(mut state) => {
                // replay starts from a fresh schedule and cannot see the
                // manual hold; only resume or completion may lift it
                if self.state.status == LoanStatus::Paused && !state.status.is_settled() {
                    state.status = LoanStatus::Paused;
                }
                self.state = state;
            }
            Err(e) => {
                // restore the history, the deletion did not happen
                self.payments.insert(index, removed);
                return Err(e);
            }
        }

        self.events.emit(Event::PaymentDeleted {
            loan_id: self.id,
            payment_id: removed.payment_id,
            amount: removed.amount,
            timestamp: time.now(),
        });
        self.snapshots
            .push(LedgerSnapshot::capture(self.id, &self.state, "delete", time));
        Ok(&self.state)
    }

    /// place the loan on manual hold
    pub fn pause(&mut self, time: &SafeTimeProvider) -> Result<()> {
        match self.state.status {
            LoanStatus::Active | LoanStatus::Overdue => {
                self.state.status = LoanStatus::Paused;
                self.events.emit(Event::LoanPaused {
                    loan_id: self.id,
                    timestamp: time.now(),
                });
                Ok(())
            }
            status => Err(LedgerError::InvalidState {
                current: format!("{status:?}"),
                expected: "Active or Overdue".to_string(),
            }),
        }
    }

    /// lift a manual hold, landing on Active or Overdue depending on
    /// where the due date sits today
    pub fn resume(&mut self, time: &SafeTimeProvider) -> Result<()> {
        if self.state.status != LoanStatus::Paused {
            return Err(LedgerError::InvalidState {
                current: format!("{:?}", self.state.status),
                expected: "Paused".to_string(),
            });
        }
        let today = time.now().date_naive();
        self.state.status = if self.state.next_due_date < today {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        };
        self.events.emit(Event::LoanResumed {
            loan_id: self.id,
            timestamp: time.now(),
        });
        Ok(())
    }

    /// mark an active loan overdue once its due date passes uncollected
    pub fn refresh_status(&mut self, as_of: NaiveDate) {
        if self.state.status == LoanStatus::Active && self.state.next_due_date < as_of {
            self.state.status = LoanStatus::Overdue;
            self.events.emit(Event::LoanMarkedOverdue {
                loan_id: self.id,
                due_date: self.state.next_due_date,
            });
        }
    }

    pub fn total_payable(&self) -> Money {
        self.terms.total_payable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_loan(time: &SafeTimeProvider) -> Loan {
        let terms = LoanTerms::daily(Money::from_major(10_000), date(2025, 8, 28));
        Loan::open(terms, time).unwrap()
    }

    #[test]
    fn test_open_emits_event_and_snapshot() {
        let time = clock(2025, 8, 28);
        let loan = daily_loan(&time);

        assert_eq!(loan.state.total_installments, 100);
        assert_eq!(loan.events.events().len(), 1);
        assert_eq!(loan.snapshots.len(), 1);
        assert!(matches!(
            loan.events.events()[0],
            Event::LoanOpened { total_installments: 100, .. }
        ));
    }

    #[test]
    fn test_record_payment_advances_ledger() {
        let time = clock(2025, 8, 29);
        let mut loan = daily_loan(&time);

        loan.record_payment(Money::from_major(400), PaymentMethod::Cash, None, &time)
            .unwrap();

        assert_eq!(loan.state.paid_installments, dec!(4));
        assert_eq!(loan.state.next_due_date, date(2025, 9, 2));
        assert_eq!(loan.payments.len(), 1);
        assert_eq!(loan.payments[0].payment_date, date(2025, 8, 29));
        assert!(matches!(
            loan.events.events()[1],
            Event::PaymentReceived { amount, .. } if amount == Money::from_major(400)
        ));
    }

    #[test]
    fn test_closing_payment_emits_completed() {
        let time = clock(2025, 8, 29);
        let mut loan = daily_loan(&time);

        loan.record_payment(Money::from_major(10_000), PaymentMethod::Upi, None, &time)
            .unwrap();

        assert_eq!(loan.state.status, LoanStatus::Completed);
        assert!(loan
            .events
            .events()
            .iter()
            .any(|e| matches!(e, Event::LoanCompleted { .. })));
    }

    #[test]
    fn test_rejected_payment_leaves_loan_untouched() {
        let time = clock(2025, 8, 29);
        let mut loan = daily_loan(&time);
        let before = loan.state.clone();

        let result = loan.record_payment(Money::ZERO, PaymentMethod::Cash, None, &time);
        assert!(result.is_err());
        assert_eq!(loan.state, before);
        assert!(loan.payments.is_empty());
    }

    #[test]
    fn test_delete_payment_replays_history() {
        let time = clock(2025, 8, 29);
        let mut loan = daily_loan(&time);

        loan.record_payment(Money::from_major(400), PaymentMethod::Cash, None, &time)
            .unwrap();
        loan.record_payment(Money::from_major(300), PaymentMethod::Upi, None, &time)
            .unwrap();
        let first_id = loan.payments[0].payment_id;

        loan.delete_payment(first_id, &time).unwrap();

        // ledger now reflects only the surviving 300 payment
        assert_eq!(loan.payments.len(), 1);
        assert_eq!(loan.state.collected_amount, Money::from_major(300));
        assert_eq!(loan.state.paid_installments, dec!(3));
        assert_eq!(loan.state.next_due_date, date(2025, 9, 1));
    }

    #[test]
    fn test_delete_payment_keeps_manual_hold() {
        let time = clock(2025, 8, 29);
        let mut loan = daily_loan(&time);

        loan.record_payment(Money::from_major(400), PaymentMethod::Cash, None, &time)
            .unwrap();
        loan.record_payment(Money::from_major(300), PaymentMethod::Upi, None, &time)
            .unwrap();
        let first_id = loan.payments[0].payment_id;
        loan.pause(&time).unwrap();

        loan.delete_payment(first_id, &time).unwrap();

        // the ledger rebuilds but the hold stays until an explicit resume
        assert_eq!(loan.state.status, LoanStatus::Paused);
        assert_eq!(loan.state.collected_amount, Money::from_major(300));
        assert!(!loan
            .events
            .events()
            .iter()
            .any(|e| matches!(e, Event::LoanResumed { .. })));

        loan.resume(&time).unwrap();
        assert_eq!(loan.state.status, LoanStatus::Active);
    }

    #[test]
    fn test_delete_unknown_payment() {
        let time = clock(2025, 8, 29);
        let mut loan = daily_loan(&time);

        assert!(matches!(
            loan.delete_payment(Uuid::new_v4(), &time),
            Err(LedgerError::PaymentNotFound { .. })
        ));
    }

    #[test]
    fn test_pause_and_resume() {
        let time = clock(2025, 8, 28);
        let mut loan = daily_loan(&time);

        loan.pause(&time).unwrap();
        assert_eq!(loan.state.status, LoanStatus::Paused);

        // pausing twice is an error
        assert!(loan.pause(&time).is_err());

        loan.resume(&time).unwrap();
        assert_eq!(loan.state.status, LoanStatus::Active);
    }

    #[test]
    fn test_resume_lands_overdue_when_due_date_passed() {
        let time = clock(2025, 8, 28);
        let mut loan = daily_loan(&time);
        loan.pause(&time).unwrap();

        let later = clock(2025, 9, 15);
        loan.resume(&later).unwrap();
        assert_eq!(loan.state.status, LoanStatus::Overdue);
    }

    #[test]
    fn test_refresh_status_marks_overdue() {
        let time = clock(2025, 8, 28);
        let mut loan = daily_loan(&time);

        loan.refresh_status(date(2025, 8, 29));
        assert_eq!(loan.state.status, LoanStatus::Active);

        loan.refresh_status(date(2025, 8, 30));
        assert_eq!(loan.state.status, LoanStatus::Overdue);
        assert!(loan
            .events
            .events()
            .iter()
            .any(|e| matches!(e, Event::LoanMarkedOverdue { .. })));
    }
}
