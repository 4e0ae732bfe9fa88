//! Monitoring outcome reported back to the backend

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::work_item::RequestId;

/// Completion record for one work item
///
/// Produced once all stages of a work item have run (or been skipped) and
/// sent exactly once through the report call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringOutcome {
    #[serde(rename = "idRichiesta")]
    pub request_id: RequestId,

    /// Local wall-clock time processing began, ISO-8601 without offset
    #[serde(rename = "dataInizioElaborazione")]
    pub processing_started_at: NaiveDateTime,
}

impl MonitoringOutcome {
    /// Creates an outcome, dropping sub-second precision from the start time
    pub fn new(request_id: RequestId, processing_started_at: NaiveDateTime) -> Self {
        let processing_started_at = processing_started_at
            .with_nanosecond(0)
            .unwrap_or(processing_started_at);
        Self {
            request_id,
            processing_started_at,
        }
    }
}
