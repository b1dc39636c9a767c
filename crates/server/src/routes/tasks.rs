use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, patch},
};
use db::models::task::{CreateTask, Task, UpdateTask};
use deployment::Deployment;

use super::{ApiPath, ApiQuery, SortParams};
use crate::{DeploymentImpl, error::ApiError, validation::ValidatedJson};

pub async fn get_tasks(
    State(deployment): State<DeploymentImpl>,
    ApiPath(todo_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<SortParams>,
) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    let tasks = deployment
        .task()
        .list_tasks(
            &deployment.db().pool,
            todo_id,
            params.sort_by.as_deref(),
            params.direction.as_deref(),
        )
        .await?;
    Ok(ResponseJson(tasks))
}

pub async fn get_task(
    State(deployment): State<DeploymentImpl>,
    ApiPath((todo_id, task_id)): ApiPath<(i64, i64)>,
) -> Result<ResponseJson<Task>, ApiError> {
    let task = deployment
        .task()
        .get_task(&deployment.db().pool, todo_id, task_id)
        .await?;
    Ok(ResponseJson(task))
}

pub async fn create_task(
    State(deployment): State<DeploymentImpl>,
    ApiPath(todo_id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<CreateTask>,
) -> Result<(StatusCode, ResponseJson<Task>), ApiError> {
    tracing::debug!("Creating task '{}' under todo {}", payload.title, todo_id);

    let task = deployment
        .task()
        .create_task(&deployment.db().pool, todo_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(task)))
}

pub async fn update_task(
    State(deployment): State<DeploymentImpl>,
    ApiPath((todo_id, task_id)): ApiPath<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<UpdateTask>,
) -> Result<ResponseJson<Task>, ApiError> {
    let task = deployment
        .task()
        .update_task(&deployment.db().pool, todo_id, task_id, &payload)
        .await?;
    Ok(ResponseJson(task))
}

pub async fn toggle_task(
    State(deployment): State<DeploymentImpl>,
    ApiPath((todo_id, task_id)): ApiPath<(i64, i64)>,
) -> Result<ResponseJson<Task>, ApiError> {
    let task = deployment
        .task()
        .toggle_task(&deployment.db().pool, todo_id, task_id)
        .await?;
    Ok(ResponseJson(task))
}

pub async fn delete_task(
    State(deployment): State<DeploymentImpl>,
    ApiPath((todo_id, task_id)): ApiPath<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    deployment
        .task()
        .delete_task(&deployment.db().pool, todo_id, task_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<DeploymentImpl> {
    let task_id_router = Router::new()
        .route("/", get(get_task).put(update_task).delete(delete_task))
        .route("/toggle", patch(toggle_task));

    let inner = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .nest("/{task_id}", task_id_router);

    // mount under /todos/{todo_id}/tasks
    Router::new().nest("/tasks", inner)
}
