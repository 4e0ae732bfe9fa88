//! Work item domain types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::window::ProcessingWindow;

/// Opaque identifier of a monitoring request
///
/// The backend issues numeric ids but some deployments send them as strings,
/// so both are accepted. The id is echoed back in the form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// One unit of monitoring work claimed from the backend queue
///
/// Immutable once fetched and consumed within a single driver iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(rename = "idRichiesta", alias = "requestId")]
    pub request_id: RequestId,

    #[serde(rename = "dataAvvioPianificata", alias = "scheduledStartTime")]
    pub scheduled_start_time: NaiveDateTime,

    #[serde(rename = "dataRiferimento", alias = "referenceDate")]
    pub reference_date: NaiveDate,
}

impl WorkItem {
    /// The June-August window of the year preceding the reference date
    pub fn processing_window(&self) -> ProcessingWindow {
        ProcessingWindow::for_reference_date(self.reference_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_backend_field_names() {
        let json = r#"{
            "idRichiesta": 42,
            "dataAvvioPianificata": "2024-06-01T08:00:00",
            "dataRiferimento": "2024-03-15"
        }"#;

        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.request_id, RequestId::Number(42));
        assert_eq!(
            item.scheduled_start_time,
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
        );
        assert_eq!(
            item.reference_date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_decodes_english_aliases_and_string_id() {
        let json = r#"{
            "requestId": "42",
            "scheduledStartTime": "2024-06-01T08:00:00",
            "referenceDate": "2024-03-15"
        }"#;

        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.request_id, RequestId::from("42"));
    }

    #[test]
    fn test_request_id_serializes_numeric_ids_as_numbers() {
        assert_eq!(serde_json::to_string(&RequestId::from(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&RequestId::from("abc")).unwrap(),
            "\"abc\""
        );
    }

    #[test]
    fn test_request_id_keeps_wire_form() {
        for raw in [r#""0042""#, r#""+42""#, r#""-0""#, r#""42""#, "42"] {
            let id: RequestId = serde_json::from_str(raw).unwrap();
            assert_eq!(serde_json::to_string(&id).unwrap(), raw);
        }

        let id: RequestId = serde_json::from_str(r#""0042""#).unwrap();
        assert_eq!(id.to_string(), "0042");
        assert_ne!(id, RequestId::from(42));
    }
}
