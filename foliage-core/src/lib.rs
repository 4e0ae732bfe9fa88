//! Foliage Core
//!
//! Core types shared by the monitoring batch.
//!
//! This crate contains:
//! - Domain types: work items, processing windows, outcomes and job results
//! - DTOs: wire shapes exchanged with the backend and the EOP services

pub mod domain;
pub mod dto;
