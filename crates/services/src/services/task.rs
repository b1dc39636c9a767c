use db::{
    DbErr, DbPool, TransactionTrait,
    models::{
        task::{CreateTask, Task, UpdateTask},
        todo::Todo,
    },
    types::{Sort, SortError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskServiceError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Sort(#[from] SortError),
    #[error("TodoItem not found with id: {0}")]
    TodoNotFound(i64),
    #[error("Task not found with id: {task_id} for todo: {todo_id}")]
    TaskNotFound { todo_id: i64, task_id: i64 },
}

pub type Result<T> = std::result::Result<T, TaskServiceError>;

/// Task operations, always scoped to the owning todo.
#[derive(Clone, Default)]
pub struct TaskService;

impl TaskService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_tasks(
        &self,
        pool: &DbPool,
        todo_id: i64,
        sort_by: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Vec<Task>> {
        if !Todo::exists(pool, todo_id).await? {
            return Err(TaskServiceError::TodoNotFound(todo_id));
        }
        let sort = Sort::parse(sort_by, direction)?;
        Ok(Task::find_by_todo_id(pool, todo_id, &sort).await?)
    }

    /// A task id that exists under another todo is reported as not found.
    pub async fn get_task(&self, pool: &DbPool, todo_id: i64, task_id: i64) -> Result<Task> {
        Task::find_by_id_and_todo_id(pool, task_id, todo_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound { todo_id, task_id })
    }

    pub async fn create_task(
        &self,
        pool: &DbPool,
        todo_id: i64,
        payload: &CreateTask,
    ) -> Result<Task> {
        let tx = pool.begin().await?;

        if !Todo::exists(&tx, todo_id).await? {
            return Err(TaskServiceError::TodoNotFound(todo_id));
        }
        let task = Task::create(&tx, todo_id, payload).await?;

        tx.commit().await?;
        tracing::debug!(todo_id, task_id = task.id, "Created task");
        Ok(task)
    }

    pub async fn update_task(
        &self,
        pool: &DbPool,
        todo_id: i64,
        task_id: i64,
        payload: &UpdateTask,
    ) -> Result<Task> {
        let tx = pool.begin().await?;

        if Task::find_by_id_and_todo_id(&tx, task_id, todo_id)
            .await?
            .is_none()
        {
            return Err(TaskServiceError::TaskNotFound { todo_id, task_id });
        }
        let task = Task::update(&tx, task_id, payload).await?;

        tx.commit().await?;
        tracing::debug!(todo_id, task_id, "Updated task");
        Ok(task)
    }

    /// Flips `completed` and leaves every other field alone.
    pub async fn toggle_task(&self, pool: &DbPool, todo_id: i64, task_id: i64) -> Result<Task> {
        let tx = pool.begin().await?;

        let current = Task::find_by_id_and_todo_id(&tx, task_id, todo_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound { todo_id, task_id })?;
        let task = Task::update(&tx, task_id, &UpdateTask::completed(!current.completed)).await?;

        tx.commit().await?;
        tracing::debug!(todo_id, task_id, completed = task.completed, "Toggled task");
        Ok(task)
    }

    pub async fn delete_task(&self, pool: &DbPool, todo_id: i64, task_id: i64) -> Result<()> {
        let tx = pool.begin().await?;

        if Task::find_by_id_and_todo_id(&tx, task_id, todo_id)
            .await?
            .is_none()
        {
            return Err(TaskServiceError::TaskNotFound { todo_id, task_id });
        }
        Task::delete(&tx, task_id).await?;

        tx.commit().await?;
        tracing::debug!(todo_id, task_id, "Deleted task");
        Ok(())
    }
}
