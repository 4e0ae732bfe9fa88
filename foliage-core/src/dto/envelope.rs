//! Response envelope of the EOP services
//!
//! Both services wrap every answer in the same shape, but the preprocessing
//! service spells the success flag `isOk` while the monitoring service spells
//! it `isOK`. Either flag being `true` means success.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Raw envelope as sent on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceEnvelope {
    /// Number in one service, string in the other
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<JsonValue>,

    #[serde(rename = "isOk", default, skip_serializing_if = "Option::is_none")]
    pub is_ok: Option<bool>,

    #[serde(rename = "isOK", default, skip_serializing_if = "Option::is_none")]
    pub is_ok_upper: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl ServiceEnvelope {
    /// Normalised success flag
    pub fn succeeded(&self) -> bool {
        self.is_ok == Some(true) || self.is_ok_upper == Some(true)
    }

    /// Human readable description of the reported error, if any
    pub fn error_description(&self) -> Option<String> {
        self.error.as_ref().and_then(EnvelopeError::describe)
    }
}

/// Error detail carried by a failed envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeError {
    #[serde(default)]
    pub coderr: Option<i64>,
    #[serde(default)]
    pub deserr: Option<String>,
}

impl EnvelopeError {
    fn describe(&self) -> Option<String> {
        match (self.coderr, self.deserr.as_deref()) {
            (_, Some(desc)) if !desc.is_empty() => match self.coderr {
                Some(code) => Some(format!("[{}] {}", code, desc)),
                None => Some(desc.to_string()),
            },
            (Some(code), _) if code != 0 => Some(format!("error code {}", code)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either_flag_spelling_means_success() {
        let lower: ServiceEnvelope = serde_json::from_str(r#"{"isOk": true}"#).unwrap();
        let upper: ServiceEnvelope = serde_json::from_str(r#"{"isOK": true, "data": {}}"#).unwrap();
        let both_false: ServiceEnvelope =
            serde_json::from_str(r#"{"isOk": false, "isOK": false}"#).unwrap();
        let missing: ServiceEnvelope = serde_json::from_str(r#"{"data": null}"#).unwrap();

        assert!(lower.succeeded());
        assert!(upper.succeeded());
        assert!(!both_false.succeeded());
        assert!(!missing.succeeded());
    }

    #[test]
    fn test_api_version_accepts_number_or_string() {
        let number: ServiceEnvelope =
            serde_json::from_str(r#"{"api_version": 1.2, "isOk": true}"#).unwrap();
        let text: ServiceEnvelope =
            serde_json::from_str(r#"{"api_version": "1.0", "isOK": true}"#).unwrap();

        assert!(number.api_version.is_some());
        assert!(text.api_version.is_some());
    }

    #[test]
    fn test_error_description() {
        let failed: ServiceEnvelope = serde_json::from_str(
            r#"{"isOk": false, "error": {"coderr": 3, "deserr": "region id does not exist"}}"#,
        )
        .unwrap();
        assert_eq!(
            failed.error_description().as_deref(),
            Some("[3] region id does not exist")
        );

        let clean: ServiceEnvelope =
            serde_json::from_str(r#"{"isOK": true, "error": {"coderr": 0, "deserr": ""}}"#)
                .unwrap();
        assert_eq!(clean.error_description(), None);

        let empty_error: ServiceEnvelope =
            serde_json::from_str(r#"{"isOK": false, "error": {}}"#).unwrap();
        assert_eq!(empty_error.error_description(), None);
    }
}
