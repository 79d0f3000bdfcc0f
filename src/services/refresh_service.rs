use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::{CourseConfig, CourseRegistry};
use crate::error::AppError;
use crate::mailerlite::MailerLiteClient;
use crate::models::{CounterEntry, Group};
use crate::store::Store;

#[derive(Clone, Copy, Debug)]
pub struct RefreshOptions {
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(15),
        }
    }
}

pub struct RefreshService {
    store: Arc<Store>,
    provider: Arc<dyn MailerLiteClient>,
    courses: Arc<CourseRegistry>,
    options: RefreshOptions,
    // held for the whole cycle so overlapping triggers queue up
    cycle: Mutex<()>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct RefreshStats {
    pub groups: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RefreshService {
    pub fn new(
        store: Arc<Store>,
        provider: Arc<dyn MailerLiteClient>,
        courses: Arc<CourseRegistry>,
        options: RefreshOptions,
    ) -> Self {
        Self {
            store,
            provider,
            courses,
            options: RefreshOptions {
                concurrency: options.concurrency.max(1),
                ..options
            },
            cycle: Mutex::new(()),
        }
    }

    /// Fetches the current count of every group and writes the results in a
    /// single store update. A failing group keeps its previous counter.
    pub async fn refresh_all(&self) -> Result<RefreshStats, AppError> {
        let _cycle = self.cycle.lock().await;

        let groups = self.store.list_groups().await;
        let mut stats = RefreshStats {
            groups: groups.len(),
            ..RefreshStats::default()
        };

        if groups.is_empty() {
            info!("No groups configured, nothing to refresh");
            return Ok(stats);
        }

        info!("Starting refresh of {} groups...", groups.len());

        let mut jobs = Vec::with_capacity(groups.len());
        for group in groups {
            match self.courses.usable(&group.course_key) {
                Some(course) => jobs.push((group, course.clone())),
                None => {
                    warn!(
                        "Skipping group {}: no API key for course {}",
                        group.id, group.course_key
                    );
                    stats.skipped += 1;
                }
            }
        }

        let timeout = self.options.timeout;
        let outcomes: Vec<(Group, Result<CounterEntry, AppError>)> = stream::iter(jobs)
            .map(|(group, course)| {
                let provider = self.provider.clone();
                async move {
                    let result = fetch_counter(provider, &group, &course, timeout).await;
                    (group, result)
                }
            })
            .buffer_unordered(self.options.concurrency)
            .collect()
            .await;

        let mut updates = Vec::with_capacity(outcomes.len());
        for (group, result) in outcomes {
            match result {
                Ok(entry) => {
                    info!(
                        "{} / {}: {}",
                        entry.course_display_name, entry.group_display_name, entry.count
                    );
                    updates.push((group.id, entry));
                }
                Err(e) => {
                    error!("Refresh failed for {}: {}", group.display_name, e);
                    stats.failed += 1;
                }
            }
        }

        stats.updated = self.store.apply_counters(updates).await?;

        info!("Refresh completed: {:?}", stats);
        Ok(stats)
    }
}

async fn fetch_counter(
    provider: Arc<dyn MailerLiteClient>,
    group: &Group,
    course: &CourseConfig,
    timeout: Duration,
) -> Result<CounterEntry, AppError> {
    let request = provider.fetch_group(&course.credential, &group.provider_group_id);

    let info = tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| {
            AppError::Provider(format!("MailerLite request timed out after {:?}", timeout))
        })??;

    Ok(CounterEntry {
        course_display_name: course.display_name.clone(),
        group_display_name: group.display_name.clone(),
        count: info.active,
        last_update: Utc::now(),
    })
}
