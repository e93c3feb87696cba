//! Business logic services

pub mod auth;
pub mod catalog;
pub mod notifier;
pub mod orders;

use crate::{
    config::{AuthConfig, EmailConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub orders: orders::OrdersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub async fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
    ) -> AppResult<Self> {
        let notifier = notifier::NotifierService::start(email_config);

        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            orders: orders::OrdersService::new(repository.clone(), notifier),
            repository,
        })
    }

    /// Database connectivity probe for readiness checks
    pub async fn ping_database(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.repository.pool)
            .await?;
        Ok(())
    }
}
