#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use counters::config::{CourseConfig, CourseRegistry};
use counters::error::AppError;
use counters::mailerlite::{GroupInfo, MailerLiteClient};
use counters::models::StoreData;
use counters::services::{RefreshOptions, RefreshService};
use counters::state::AppState;
use counters::store::Store;

#[derive(Clone, Debug)]
pub enum Reply {
    Active(u64),
    Status(u16),
    Slow(Duration, u64),
}

/// In-process MailerLite stand-in answering per provider group id.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: HashMap<String, Reply>,
    delay: Duration,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, group_id: &str, reply: Reply) -> Self {
        self.replies.insert(group_id.to_string(), reply);
        self
    }

    /// Delay applied to every call, to make overlap observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailerLiteClient for ScriptedProvider {
    async fn fetch_group(&self, api_key: &str, group_id: &str) -> Result<GroupInfo, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self.replies.get(group_id).cloned().unwrap_or(Reply::Status(404));
        let result = match reply {
            _ if api_key.is_empty() => Err(AppError::Provider("missing api key".to_string())),
            Reply::Active(active) => Ok(GroupInfo { active, ..GroupInfo::default() }),
            Reply::Status(status) => {
                Err(AppError::Provider(format!("MailerLite API error {}", status)))
            }
            Reply::Slow(delay, active) => {
                tokio::time::sleep(delay).await;
                Ok(GroupInfo { active, ..GroupInfo::default() })
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn courses() -> Arc<CourseRegistry> {
    Arc::new(CourseRegistry::new(vec![
        CourseConfig::new("k1", "Course One", "key-one"),
        CourseConfig::new("k2", "Course Two", "key-two"),
        CourseConfig::new("nokey", "No Key Course", ""),
    ]))
}

pub fn refresher(
    store: Arc<Store>,
    provider: Arc<ScriptedProvider>,
    options: RefreshOptions,
) -> Arc<RefreshService> {
    Arc::new(RefreshService::new(store, provider, courses(), options))
}

pub fn app_state(provider: Arc<ScriptedProvider>) -> AppState {
    let store = Arc::new(Store::in_memory(StoreData::default()));
    let refresher = refresher(store.clone(), provider, RefreshOptions::default());
    AppState {
        store,
        refresher,
        courses: courses(),
        public_base_url: "https://counters.example.com".to_string(),
    }
}
