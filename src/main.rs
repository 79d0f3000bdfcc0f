use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use counters::api::router;
use counters::config::{CourseRegistry, Settings};
use counters::mailerlite::{MailerLiteConfig, MailerLiteHttpClient};
use counters::services::{RefreshOptions, RefreshScheduler, RefreshService};
use counters::state::AppState;
use counters::store::Store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "counters=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new_from_env();
    let courses = Arc::new(CourseRegistry::new_from_env());
    let store = Arc::new(Store::open(&settings.data_path).await?);

    let provider = Arc::new(MailerLiteHttpClient::new(MailerLiteConfig::new(
        settings.mailerlite_base_url.clone(),
    ))?);

    let refresher = Arc::new(RefreshService::new(
        store.clone(),
        provider,
        courses.clone(),
        RefreshOptions {
            concurrency: settings.refresh_concurrency,
            timeout: settings.provider_timeout,
        },
    ));

    refresher.refresh_all().await?;

    let scheduler = RefreshScheduler::new(refresher.clone(), settings.refresh_interval);
    tokio::spawn(scheduler.start());

    let state = AppState {
        store,
        refresher,
        courses,
        public_base_url: settings.public_base_url.clone(),
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("listening on http://{}", addr);
    info!("admin panel: {}/admin", settings.public_base_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
