//! Service layer
//!
//! Services contain the business logic of a monitoring run: moving files
//! through the shared directory, driving the EOP stages of a work item and
//! checking that the EOP services are reachable.
//!
//! The work item lifecycle is trait-based so the driver can be tested
//! without any remote system.

mod monitoring;
mod requirements;
mod transfer;

// Re-export traits
pub use monitoring::MonitoringService;

// Re-export implementations
pub use monitoring::{StageSettings, StandardMonitoringService};
pub use requirements::check_requirements;
pub use transfer::{FileTransferGateway, SharedDirectory};
