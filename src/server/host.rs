//! Server host for transport-agnostic API exposure
//!
//! The host holds the state every exposure needs: the order service and the
//! application configuration. It knows nothing about HTTP.

use crate::config::AppConfig;
use crate::core::service::OrderService;
use crate::core::store::OrderStore;
use std::sync::Arc;

/// Host context shared by the exposures
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(ServerHost::new(store, config));
/// let app = RestExposure::build_router(host, vec![])?;
/// ```
#[derive(Clone)]
pub struct ServerHost {
    /// Record management and reporting operations
    pub service: OrderService,

    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl ServerHost {
    pub fn new(store: Arc<dyn OrderStore>, config: AppConfig) -> Self {
        Self {
            service: OrderService::new(store),
            config: Arc::new(config),
        }
    }

    /// Name of the backing store, for logs and health output
    pub fn backend(&self) -> &'static str {
        self.service.store().backend()
    }
}
