use std::collections::BTreeMap;

use axum::Json;
use axum::extract::Path;
use axum::http::{HeaderValue, header};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::info;

use crate::config::CourseSummary;
use crate::error::AppError;
use crate::models::*;
use crate::services::RefreshStats;
use crate::state::AppState;
use crate::store::StoreError;
use crate::web;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatus {
    status: &'static str,
    service: &'static str,
    total_groups: usize,
    admin_panel: &'static str,
}

#[derive(Serialize)]
struct CreateGroupResponse {
    success: bool,
    group: Group,
    counter: Option<CounterEntry>,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Serialize)]
struct RefreshResponse {
    status: &'static str,
    stats: RefreshStats,
    data: BTreeMap<String, CounterEntry>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_status))
        .route("/health", get(health))
        .route("/admin", get(admin_page))
        .route("/widget.js", get(widget_script))
        .route("/api/courses", get(list_courses))
        .route("/api/groups", get(list_groups).post(create_group))
        .route("/api/groups/{id}", delete(delete_group))
        .route("/api/counters", get(list_counters))
        .route("/api/counter/{id}", get(get_counter))
        .route("/api/widgets", get(list_widgets))
        .route("/api/widgets/{id}", post(upsert_widget).put(upsert_widget))
        .route("/api/widget/{id}", get(widget_payload))
        .route("/api/embed/{id}", get(embed_snippet))
        .route("/api/refresh", get(refresh_now).post(refresh_now))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

async fn allow_any_origin(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE"),
    );
    response
}

async fn service_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok",
        service: "Subscriber Counters API",
        total_groups: state.store.group_count().await,
        admin_panel: "/admin",
    })
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.check().await?;
    Ok(StatusCode::OK)
}

async fn admin_page(State(state): State<AppState>) -> Html<String> {
    Html(web::admin_page(&state.courses))
}

async fn widget_script(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        web::widget::script(&state.public_base_url),
    )
}

async fn list_courses(State(state): State<AppState>) -> Json<Vec<CourseSummary>> {
    Json(state.courses.summaries())
}

async fn list_groups(State(state): State<AppState>) -> Json<Vec<Group>> {
    Json(state.store.list_groups().await)
}

async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<NewGroupRequest>
) -> Result<Json<CreateGroupResponse>, AppError> {
    let group = req.validate(&state.courses)?;
    let group = state.store.insert_group(group).await.map_err(|e| match e {
        StoreError::DuplicateGroup(id) => {
            AppError::Conflict(format!("Group with id '{}' already exists", id))
        }
        e => AppError::Store(e),
    })?;
    info!("Added group {} ({})", group.id, group.course_key);

    // the caller waits for the first count
    state.refresher.refresh_all().await?;
    let counter = state.store.counter(&group.id).await;

    Ok(Json(CreateGroupResponse {
        success: true,
        group,
        counter,
    }))
}

async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<SuccessResponse>, AppError> {
    if state.store.remove_group(&id).await? {
        info!("Removed group {}", id);
    }
    Ok(Json(SuccessResponse { success: true }))
}

async fn list_counters(State(state): State<AppState>) -> Json<BTreeMap<String, CounterEntry>> {
    Json(state.store.counters().await)
}

async fn get_counter(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<CounterEntry>, AppError> {
    let counter = state.store.counter(&id).await.ok_or(AppError::NotFound)?;
    Ok(Json(counter))
}

async fn list_widgets(State(state): State<AppState>) -> Json<BTreeMap<String, WidgetPreference>> {
    Json(state.store.widgets().await)
}

async fn upsert_widget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<WidgetPreference>
) -> Result<Json<WidgetPreference>, AppError> {
    let preference = state.store.upsert_widget(&id, req).await?;
    Ok(Json(preference))
}

async fn widget_payload(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<WidgetPayload>, AppError> {
    let counter = state.store.counter(&id).await.ok_or(AppError::NotFound)?;
    let preference = state.store.widget(&id).await;
    Ok(Json(web::widget::payload(&id, &counter, preference.as_ref())))
}

async fn embed_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<String, AppError> {
    let known = state.store.list_groups().await.iter().any(|g| g.id == id);
    if !known {
        return Err(AppError::NotFound);
    }
    Ok(web::widget::embed_snippet(&state.public_base_url, &id))
}

async fn refresh_now(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let stats = state.refresher.refresh_all().await?;
    Ok(Json(RefreshResponse {
        status: "refreshed",
        stats,
        data: state.store.counters().await,
    }))
}
