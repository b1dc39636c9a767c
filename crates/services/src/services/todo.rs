use db::{
    DbErr, DbPool, TransactionTrait,
    models::{
        task::Task,
        todo::{CreateTodo, Todo, UpdateTodo},
    },
    types::{Sort, SortError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoServiceError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Sort(#[from] SortError),
    #[error("TodoItem not found with id: {0}")]
    TodoNotFound(i64),
}

pub type Result<T> = std::result::Result<T, TodoServiceError>;

#[derive(Clone, Default)]
pub struct TodoService;

impl TodoService {
    pub fn new() -> Self {
        Self
    }

    /// Every todo with its tasks, ordered by `sort_by` / `direction`.
    pub async fn list_todos(
        &self,
        pool: &DbPool,
        sort_by: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Vec<Todo>> {
        let sort = Sort::parse(sort_by, direction)?;
        Ok(Todo::find_all(pool, &sort).await?)
    }

    pub async fn get_todo(&self, pool: &DbPool, id: i64) -> Result<Todo> {
        Todo::find_by_id(pool, id)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))
    }

    /// Inserts the todo and any nested tasks atomically.
    pub async fn create_todo(&self, pool: &DbPool, payload: &CreateTodo) -> Result<Todo> {
        let tx = pool.begin().await?;

        let mut todo = Todo::create(&tx, payload).await?;
        for task in payload.nested_tasks() {
            let created = Task::create(&tx, todo.id, task).await?;
            todo.tasks.push(created);
        }

        tx.commit().await?;
        tracing::debug!(todo_id = todo.id, tasks = todo.tasks.len(), "Created todo");
        Ok(todo)
    }

    pub async fn update_todo(&self, pool: &DbPool, id: i64, payload: &UpdateTodo) -> Result<Todo> {
        let tx = pool.begin().await?;

        if !Todo::exists(&tx, id).await? {
            return Err(TodoServiceError::TodoNotFound(id));
        }
        let todo = Todo::update(&tx, id, payload).await?;

        tx.commit().await?;
        tracing::debug!(todo_id = id, "Updated todo");
        Ok(todo)
    }

    /// Removes the todo together with every task it owns.
    pub async fn delete_todo(&self, pool: &DbPool, id: i64) -> Result<()> {
        let tx = pool.begin().await?;

        if !Todo::exists(&tx, id).await? {
            return Err(TodoServiceError::TodoNotFound(id));
        }
        let tasks_removed = Task::delete_by_todo_id(&tx, id).await?;
        Todo::delete(&tx, id).await?;

        tx.commit().await?;
        tracing::debug!(todo_id = id, tasks_removed, "Deleted todo");
        Ok(())
    }
}
