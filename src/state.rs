//! Shared application state handed to every handler

use crate::config::Config;
use crate::repository::UserRepositoryImpl;
use crate::service::AuthService;
use crate::store::DocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub auth_service: Arc<AuthService<UserRepositoryImpl>>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the repository and services on top of `store`
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let user_repo = Arc::new(UserRepositoryImpl::new(
            store.clone(),
            config.store.users_collection.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
            auth_service: Arc::new(AuthService::new(user_repo)),
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics_handle = handle;
        self
    }

    /// Whether the backing store answers
    pub async fn check_ready(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}
