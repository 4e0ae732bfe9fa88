//! Data Transfer Objects
//!
//! Request and response bodies for the EOP processing services.

pub mod envelope;
pub mod monitor;
