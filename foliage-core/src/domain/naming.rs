//! Timestamp stamps and file names
//!
//! The EOP services and the backend agree on file names built from the
//! scheduled start, the region and the processing window. Everything here is
//! a pure function of those inputs.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::window::ProcessingWindow;

/// `yyyyMMdd`
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `yyyyMMddHHmm`
pub fn minute_stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d%H%M").to_string()
}

/// `yyyyMMddHHmmss`
pub fn second_stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

/// Year offsets of the preprocessing outputs the monitoring service may read
pub const PREPROCESSING_YEAR_OFFSETS: [i32; 3] = [-1, 0, 1];

/// Kind of result artifact produced by the monitoring service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Alert,
    Nat2000,
}

impl ResultKind {
    pub const ALL: [ResultKind; 2] = [ResultKind::Alert, ResultKind::Nat2000];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Alert => "alert",
            ResultKind::Nat2000 => "nat2000",
        }
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate preprocessing output names, one per entry of
/// [`PREPROCESSING_YEAR_OFFSETS`] and in that order
pub fn preprocessing_file_names(
    scheduled_start: NaiveDateTime,
    region: &str,
    window: &ProcessingWindow,
) -> Vec<String> {
    let prefix = format!("{}_PRE_{}", minute_stamp(scheduled_start), region);

    PREPROCESSING_YEAR_OFFSETS
        .iter()
        .map(|offset| {
            let candidate = window.shifted(*offset);
            format!(
                "{}_{}_{}_0_1_R.nc",
                prefix,
                date_stamp(candidate.start),
                date_stamp(candidate.end)
            )
        })
        .collect()
}

/// Name of a result artifact in the shared `output` directory
///
/// The stamp is the same second-precision `data_rif` the monitoring service
/// receives, since that is what it names its outputs with.
pub fn result_file_name(
    scheduled_start: NaiveDateTime,
    region: &str,
    window: &ProcessingWindow,
    kind: ResultKind,
) -> String {
    format!(
        "{}_MON_{}_{}_{}_0_1_{}.geojson",
        second_stamp(scheduled_start),
        region,
        date_stamp(window.start),
        date_stamp(window.end),
        kind
    )
}
