//! Portfolio aggregation.
//!
//! Read-only summaries over the current set of loans; nothing here
//! mutates a ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::loan::Loan;
use crate::payment::PaymentRecord;
use crate::types::LoanId;

/// how many recent payments the dashboard shows
pub const RECENT_PAYMENT_COUNT: usize = 5;

/// portfolio-level dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioSummary {
    /// cash actually handed out, the sum of disbursed amounts
    pub total_given: Money,
    pub total_collected: Money,
    pub total_outstanding: Money,
    /// interest is the only profit component; daily plans contribute zero
    pub total_profit: Money,
    /// active loans whose next due date is the as-of date
    pub due_today: Vec<LoanId>,
    /// active loans whose next due date is behind the as-of date
    pub overdue: Vec<LoanId>,
    /// most recent payments across the portfolio, newest first
    pub recent_payments: Vec<PaymentRecord>,
}

/// summarize a portfolio as of a given date
///
/// Pure over its input: safe on an empty slice, and two calls with the
/// same loans and date produce identical summaries. The overdue test
/// here is the same `next_due_date < as_of` comparison the payment
/// applicator uses for its status transition.
pub fn summarize(loans: &[Loan], as_of: NaiveDate) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();

    for loan in loans {
        summary.total_given += loan.terms.disbursed_amount;
        summary.total_collected += loan.state.collected_amount;
        summary.total_outstanding += loan.state.remaining_amount;
        summary.total_profit += loan.terms.interest;

        if loan.state.status.is_collectible() {
            if loan.state.next_due_date == as_of {
                summary.due_today.push(loan.id);
            } else if loan.state.next_due_date < as_of {
                summary.overdue.push(loan.id);
            }
        }
    }

    let mut payments: Vec<&PaymentRecord> =
        loans.iter().flat_map(|l| l.payments.iter()).collect();
    payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
    summary.recent_payments = payments
        .into_iter()
        .take(RECENT_PAYMENT_COUNT)
        .cloned()
        .collect();

    summary
}
