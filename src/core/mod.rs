//! Core business logic: quoting, schedules and enquiry records

pub mod config;
pub mod enquiry;
pub mod log;
pub mod money;
pub mod repayment;
pub mod schedule;
pub mod store;

// Re-export main types for cleaner imports
pub use enquiry::{EnquiryBook, EnquiryStatus, FinanceEnquiry};
pub use repayment::{CalculatorLimits, Frequency, RepaymentInputs, RepaymentResult, compute};
pub use store::{RecordCollection, Store};
