pub mod calendar;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod loan;
pub mod payment;
pub mod portfolio;
pub mod schedule;
pub mod terms;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use ledger::{LedgerSnapshot, LedgerState};
pub use loan::Loan;
pub use payment::{apply_payment, replay_payments, PaymentRecord};
pub use portfolio::{summarize, PortfolioSummary};
pub use schedule::derive_schedule;
pub use terms::{LoanTerms, DEFAULT_DAILY_AMOUNT};
pub use types::{InstallmentKind, LoanId, LoanStatus, PaymentId, PaymentMethod};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
