use std::sync::Arc;

use crate::config::CourseRegistry;
use crate::services::RefreshService;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub refresher: Arc<RefreshService>,
    pub courses: Arc<CourseRegistry>,
    pub public_base_url: String,
}
