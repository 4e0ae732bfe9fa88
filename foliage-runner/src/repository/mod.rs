//! Repository layer
//!
//! Repositories abstract communication with the Foliage backend behind
//! traits so the scheduler can be exercised without a live server.

mod activities;

pub use activities::ActivityRepository;

pub use activities::HttpActivityRepository;
