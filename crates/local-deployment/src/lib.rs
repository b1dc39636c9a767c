use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentError};
use services::services::{
    config::{Config, load_config_from_file, save_config_to_file},
    task::TaskService,
    todo::TodoService,
};
use utils::assets::config_path;

#[derive(Clone)]
pub struct LocalDeployment {
    config: Config,
    db: DBService,
    todo: TodoService,
    task: TaskService,
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let config = Self::load_runtime_config().await?;
        Self::from_config(config).await
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn todo(&self) -> &TodoService {
        &self.todo
    }

    fn task(&self) -> &TaskService {
        &self.task
    }
}

impl LocalDeployment {
    /// Builds the deployment from an already resolved config, connecting and migrating the database.
    pub async fn from_config(config: Config) -> Result<Self, DeploymentError> {
        let db = DBService::new(&config.database_url()).await?;

        Ok(Self {
            config,
            db,
            todo: TodoService::new(),
            task: TaskService::new(),
        })
    }

    /// The file config is persisted back normalized; environment overrides are not.
    async fn load_runtime_config() -> Result<Config, DeploymentError> {
        let path = config_path();
        let file_config = load_config_from_file(&path).await;
        save_config_to_file(&file_config, &path).await?;

        let config = file_config.with_env_overrides(|key| std::env::var(key).ok());
        tracing::info!(
            host = %config.host,
            port = config.port,
            "Loaded configuration from {}",
            path.display()
        );
        Ok(config)
    }
}
