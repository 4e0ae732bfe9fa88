//! Monitoring service request body

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::naming::{date_stamp, preprocessing_file_names, second_stamp};
use crate::domain::window::ProcessingWindow;

/// Body of `POST {monitoringUrl}/monitor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRequest {
    /// Scheduled start, `yyyyMMddHHmmss`
    pub data_rif: String,
    pub id_regione: String,
    /// `yyyyMMdd`
    pub data_ini_mon: String,
    /// `yyyyMMdd`
    pub data_fin_mon: String,
    pub path_file_preprocessing: Vec<String>,
    /// Preprocessing input as seen from inside the monitoring container
    pub path_file_fmp: String,
}

impl MonitorRequest {
    pub fn new(
        scheduled_start: NaiveDateTime,
        region: &str,
        window: &ProcessingWindow,
        container_preprocessing_path: &str,
    ) -> Self {
        Self {
            data_rif: second_stamp(scheduled_start),
            id_regione: region.to_string(),
            data_ini_mon: date_stamp(window.start),
            data_fin_mon: date_stamp(window.end),
            path_file_preprocessing: preprocessing_file_names(scheduled_start, region, window),
            path_file_fmp: container_preprocessing_path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_monitor_request_body() {
        let scheduled = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let request = MonitorRequest::new(
            scheduled,
            "10",
            &ProcessingWindow::for_year(2023),
            "/data/shared/input/preelaborazione.geojson",
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data_rif": "20240601080000",
                "id_regione": "10",
                "data_ini_mon": "20230601",
                "data_fin_mon": "20230831",
                "path_file_preprocessing": [
                    "202406010800_PRE_10_20220601_20220831_0_1_R.nc",
                    "202406010800_PRE_10_20230601_20230831_0_1_R.nc",
                    "202406010800_PRE_10_20240601_20240831_0_1_R.nc"
                ],
                "path_file_fmp": "/data/shared/input/preelaborazione.geojson"
            })
        );
    }
}
