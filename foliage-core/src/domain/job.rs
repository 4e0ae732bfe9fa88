//! Remote job result

/// Outcome of a call to one of the EOP processing services
///
/// A call only counts as successful when both the HTTP status and the
/// envelope's success flag agree.
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    /// 2xx response with a successful envelope; carries the `data` payload
    Success(serde_json::Value),
    /// 2xx response whose envelope reports failure
    ApplicationError(String),
    /// Non-2xx response
    TransportError { status: u16, body: String },
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success(_))
    }
}
