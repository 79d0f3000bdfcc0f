use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

/// Built-in courses: key, display name, env var holding the MailerLite API key.
const COURSE_DEFINITIONS: &[(&str, &str, &str)] = &[
    ("ai_marketers", "AI_marketers", "ML_API_KEY_AI_MARKETERS"),
    ("ai_managers", "AI_managers", "ML_API_KEY_AI_MANAGERS"),
    ("ai_ready_hr", "AI Ready HR", "ML_API_KEY_AI_READY_HR"),
    ("excel_ai", "Excel AI", "ML_API_KEY_EXCEL_AI"),
    ("10xdevs", "10xDevs", "ML_API_KEY_10XDEVS"),
    ("ai_product_heroes", "AI Product Heroes", "ML_API_KEY_AI_PRODUCT_HEROES"),
];

pub const DEFAULT_MAILERLITE_BASE_URL: &str = "https://api.mailerlite.com/api/v2";

#[derive(Clone, Debug)]
pub struct CourseConfig {
    pub key: String,
    pub display_name: String,
    pub credential: String,
}

impl CourseConfig {
    pub fn new(key: &str, display_name: &str, credential: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            credential: credential.to_string(),
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }
}

/// Course as exposed to the admin UI; never carries the credential.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub key: String,
    pub name: String,
    pub has_api_key: bool,
}

/// Immutable course lookup, built once at startup.
#[derive(Clone, Debug, Default)]
pub struct CourseRegistry {
    courses: BTreeMap<String, CourseConfig>,
}

impl CourseRegistry {
    /// Later entries with a duplicate key replace earlier ones.
    pub fn new(courses: Vec<CourseConfig>) -> Self {
        Self {
            courses: courses.into_iter().map(|c| (c.key.clone(), c)).collect(),
        }
    }

    pub fn new_from_env() -> Self {
        let courses = COURSE_DEFINITIONS
            .iter()
            .map(|(key, name, var)| {
                let credential = env::var(var).unwrap_or_default();
                if credential.is_empty() {
                    warn!("{} is not set, course '{}' is disabled", var, key);
                }
                CourseConfig::new(key, name, credential.trim())
            })
            .collect();
        Self::new(courses)
    }

    pub fn get(&self, key: &str) -> Option<&CourseConfig> {
        self.courses.get(key)
    }

    /// Course for `key` only when it can actually be queried.
    pub fn usable(&self, key: &str) -> Option<&CourseConfig> {
        self.get(key).filter(|c| c.has_credential())
    }

    pub fn summaries(&self) -> Vec<CourseSummary> {
        self.courses
            .values()
            .map(|c| CourseSummary {
                key: c.key.clone(),
                name: c.display_name.clone(),
                has_api_key: c.has_credential(),
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub public_base_url: String,
    pub refresh_interval: Duration,
    pub refresh_concurrency: usize,
    pub provider_timeout: Duration,
    pub mailerlite_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 3000,
            data_path: PathBuf::from("db.json"),
            public_base_url: "http://localhost:3000".to_string(),
            refresh_interval: Duration::from_secs(600),
            refresh_concurrency: 4,
            provider_timeout: Duration::from_secs(15),
            mailerlite_base_url: DEFAULT_MAILERLITE_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Unset or unparsable variables fall back to the defaults.
    pub fn new_from_env() -> Self {
        let defaults = Self::default();
        let port = parse_var("PORT").unwrap_or(defaults.port);

        Self {
            port,
            data_path: env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            refresh_interval: parse_var("REFRESH_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_interval),
            refresh_concurrency: parse_var("REFRESH_CONCURRENCY")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.refresh_concurrency),
            provider_timeout: parse_var("PROVIDER_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider_timeout),
            mailerlite_base_url: env::var("MAILERLITE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.mailerlite_base_url),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}
