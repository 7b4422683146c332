pub mod amortization;
pub mod calendar;
pub mod schedule;

pub use amortization::{
    amortization_schedule, interest_paid_to_date, loan_summary, monthly_payment,
    payments_remaining, total_interest, AmortizationRow, LoanSummary,
};
pub use schedule::{backfill_payments, pending_payments, PaymentBackfill};
