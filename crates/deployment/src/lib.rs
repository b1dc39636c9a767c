use async_trait::async_trait;
use db::{DBService, DbErr};
use services::services::{
    config::{Config, ConfigError},
    task::TaskService,
    todo::TodoService,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything a request handler needs: configuration, storage and the domain services.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new() -> Result<Self, DeploymentError>;

    fn config(&self) -> &Config;

    fn db(&self) -> &DBService;

    fn todo(&self) -> &TodoService;

    fn task(&self) -> &TaskService;
}
