pub mod error;
pub mod http;
pub mod routes;
pub mod validation;

pub type DeploymentImpl = local_deployment::LocalDeployment;
