//! Scheduler layer for the runner
//!
//! Drains the backend activity queue one work item at a time, from claim
//! through processing to completion.

pub mod driver;

pub use driver::ActivityDriver;
