//! Activity driver
//!
//! Claims activities until the backend reports none left. Each claimed
//! activity is processed and reported before the next claim. Any error
//! ends the run; the failed activity is not reported.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::repository::ActivityRepository;
use crate::service::MonitoringService;

/// Sequential driver over the activity queue
pub struct ActivityDriver {
    activities: Arc<dyn ActivityRepository>,
    monitoring: Arc<dyn MonitoringService>,
}

impl ActivityDriver {
    /// Creates a new driver
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        monitoring: Arc<dyn MonitoringService>,
    ) -> Self {
        Self {
            activities,
            monitoring,
        }
    }

    /// Runs until the queue is drained
    ///
    /// # Returns
    /// The number of activities processed and reported
    pub async fn run(&self) -> Result<usize> {
        info!("Claiming activities");
        let mut processed = 0;

        while let Some(item) = self.activities.claim_next().await? {
            info!(
                "Claimed activity {} (scheduled {}, reference date {})",
                item.request_id, item.scheduled_start_time, item.reference_date
            );

            let outcome = match self.monitoring.process(&item).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Activity {} failed: {:#}", item.request_id, e);
                    return Err(e);
                }
            };

            self.activities.complete(&outcome).await?;
            processed += 1;
            info!("Activity {} completed", item.request_id);
        }

        info!("No more activities to process");
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use foliage_core::domain::outcome::MonitoringOutcome;
    use foliage_core::domain::work_item::{RequestId, WorkItem};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn item(id: i64) -> WorkItem {
        WorkItem {
            request_id: RequestId::from(id),
            scheduled_start_time: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            reference_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        }
    }

    #[derive(Default)]
    struct InMemoryActivities {
        pending: Mutex<VecDeque<WorkItem>>,
        claims: Mutex<usize>,
        completed: Mutex<Vec<MonitoringOutcome>>,
        reject_completion_of: Option<RequestId>,
    }

    impl InMemoryActivities {
        fn with_items(ids: &[i64]) -> Self {
            Self {
                pending: Mutex::new(ids.iter().copied().map(item).collect()),
                ..Default::default()
            }
        }

        fn claims(&self) -> usize {
            *self.claims.lock().unwrap()
        }

        fn completed_ids(&self) -> Vec<RequestId> {
            self.completed
                .lock()
                .unwrap()
                .iter()
                .map(|o| o.request_id.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ActivityRepository for InMemoryActivities {
        async fn claim_next(&self) -> Result<Option<WorkItem>> {
            *self.claims.lock().unwrap() += 1;
            Ok(self.pending.lock().unwrap().pop_front())
        }

        async fn complete(&self, outcome: &MonitoringOutcome) -> Result<()> {
            if self.reject_completion_of.as_ref() == Some(&outcome.request_id) {
                anyhow::bail!("report rejected with status 500");
            }
            self.completed.lock().unwrap().push(outcome.clone());
            Ok(())
        }
    }

    /// Succeeds for every item except `fail_on`
    struct ScriptedMonitoring {
        fail_on: Option<RequestId>,
    }

    #[async_trait]
    impl MonitoringService for ScriptedMonitoring {
        async fn process(&self, item: &WorkItem) -> Result<MonitoringOutcome> {
            if self.fail_on.as_ref() == Some(&item.request_id) {
                anyhow::bail!("monitoring exploded");
            }
            Ok(MonitoringOutcome::new(item.request_id.clone(), started()))
        }
    }

    fn driver(
        activities: &Arc<InMemoryActivities>,
        fail_on: Option<i64>,
    ) -> ActivityDriver {
        ActivityDriver::new(
            activities.clone(),
            Arc::new(ScriptedMonitoring {
                fail_on: fail_on.map(RequestId::from),
            }),
        )
    }

    #[tokio::test]
    async fn test_drains_queue_in_order() {
        let activities = Arc::new(InMemoryActivities::with_items(&[1, 2, 3]));

        let processed = driver(&activities, None).run().await.unwrap();

        assert_eq!(processed, 3);
        assert_eq!(activities.claims(), 4);
        assert_eq!(
            activities.completed_ids(),
            vec![RequestId::from(1), RequestId::from(2), RequestId::from(3)]
        );
    }

    #[tokio::test]
    async fn test_empty_queue_claims_once() {
        let activities = Arc::new(InMemoryActivities::default());

        let processed = driver(&activities, None).run().await.unwrap();

        assert_eq!(processed, 0);
        assert_eq!(activities.claims(), 1);
        assert!(activities.completed_ids().is_empty());
    }

    #[tokio::test]
    async fn test_failure_stops_run_without_reporting() {
        let activities = Arc::new(InMemoryActivities::with_items(&[1, 2, 3]));

        let err = driver(&activities, Some(2)).run().await.unwrap_err();

        assert!(err.to_string().contains("monitoring exploded"));
        assert_eq!(activities.claims(), 2);
        assert_eq!(activities.completed_ids(), vec![RequestId::from(1)]);
    }

    #[tokio::test]
    async fn test_report_failure_stops_run_before_next_claim() {
        let activities = Arc::new(InMemoryActivities {
            reject_completion_of: Some(RequestId::from(1)),
            ..InMemoryActivities::with_items(&[1, 2])
        });

        let err = driver(&activities, None).run().await.unwrap_err();

        assert!(err.to_string().contains("status 500"));
        assert_eq!(activities.claims(), 1);
        assert!(activities.completed_ids().is_empty());
    }

    #[tokio::test]
    async fn test_claim_failure_is_fatal() {
        struct BrokenQueue;

        #[async_trait]
        impl ActivityRepository for BrokenQueue {
            async fn claim_next(&self) -> Result<Option<WorkItem>> {
                anyhow::bail!("backend unreachable")
            }

            async fn complete(&self, _outcome: &MonitoringOutcome) -> Result<()> {
                unreachable!("nothing was claimed")
            }
        }

        let driver = ActivityDriver::new(
            Arc::new(BrokenQueue),
            Arc::new(ScriptedMonitoring { fail_on: None }),
        );

        assert!(driver.run().await.is_err());
    }
}
