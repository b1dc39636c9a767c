use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::todo::{CreateTodo, Todo, UpdateTodo};
use deployment::Deployment;

use super::{ApiPath, ApiQuery, SortParams, tasks};
use crate::{DeploymentImpl, error::ApiError, validation::ValidatedJson};

pub async fn get_todos(
    State(deployment): State<DeploymentImpl>,
    ApiQuery(params): ApiQuery<SortParams>,
) -> Result<ResponseJson<Vec<Todo>>, ApiError> {
    let todos = deployment
        .todo()
        .list_todos(
            &deployment.db().pool,
            params.sort_by.as_deref(),
            params.direction.as_deref(),
        )
        .await?;
    Ok(ResponseJson(todos))
}

pub async fn get_todo(
    State(deployment): State<DeploymentImpl>,
    ApiPath(todo_id): ApiPath<i64>,
) -> Result<ResponseJson<Todo>, ApiError> {
    let todo = deployment
        .todo()
        .get_todo(&deployment.db().pool, todo_id)
        .await?;
    Ok(ResponseJson(todo))
}

pub async fn create_todo(
    State(deployment): State<DeploymentImpl>,
    ValidatedJson(payload): ValidatedJson<CreateTodo>,
) -> Result<(StatusCode, ResponseJson<Todo>), ApiError> {
    tracing::debug!(
        "Creating todo '{}' with {} task(s)",
        payload.title,
        payload.nested_tasks().len()
    );

    let todo = deployment
        .todo()
        .create_todo(&deployment.db().pool, &payload)
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(todo)))
}

pub async fn update_todo(
    State(deployment): State<DeploymentImpl>,
    ApiPath(todo_id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateTodo>,
) -> Result<ResponseJson<Todo>, ApiError> {
    let todo = deployment
        .todo()
        .update_todo(&deployment.db().pool, todo_id, &payload)
        .await?;
    Ok(ResponseJson(todo))
}

pub async fn delete_todo(
    State(deployment): State<DeploymentImpl>,
    ApiPath(todo_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    deployment
        .todo()
        .delete_todo(&deployment.db().pool, todo_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<DeploymentImpl> {
    let todo_id_router = Router::new()
        .route("/", get(get_todo).put(update_todo).delete(delete_todo))
        .merge(tasks::router());

    let inner = Router::new()
        .route("/", get(get_todos).post(create_todo))
        .nest("/{todo_id}", todo_id_router);

    Router::new().nest("/todos", inner)
}
