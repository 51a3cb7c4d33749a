pub mod calc;
pub mod compare;
pub mod enquiry;
pub mod models;
pub mod quote;
pub mod schedule;
pub mod setup;
pub mod ui;
