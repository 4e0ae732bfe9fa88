//! Core domain types
//!
//! The entities a monitoring run works with. Work items and outcomes travel
//! to and from the backend; windows and file names are derived locally.

pub mod job;
pub mod naming;
pub mod outcome;
pub mod window;
pub mod work_item;
