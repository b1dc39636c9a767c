use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Select,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::task::{CreateTask, Task};
use crate::{
    entities::todo_item,
    types::{Sort, SortField},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Created together with the todo when present.
    pub tasks: Option<Vec<CreateTask>>,
}

impl CreateTodo {
    pub fn from_title(title: String) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    pub fn nested_tasks(&self) -> &[CreateTask] {
        self.tasks.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTodo {
    /// Copies the fields present in the payload. `id`, `created_at` and the task
    /// collection are never touched.
    pub fn merge_into(&self, active: &mut todo_item::ActiveModel) {
        if let Some(title) = self.title.clone() {
            active.title = Set(title);
        }
        if self.description.is_some() {
            active.description = Set(self.description.clone());
        }
        if let Some(completed) = self.completed {
            active.completed = Set(completed);
        }
    }
}

fn sort_column(field: SortField) -> todo_item::Column {
    match field {
        SortField::Id => todo_item::Column::Id,
        SortField::Title => todo_item::Column::Title,
        SortField::Description => todo_item::Column::Description,
        SortField::Completed => todo_item::Column::Completed,
        SortField::CreatedAt => todo_item::Column::CreatedAt,
    }
}

fn apply_sort(query: Select<todo_item::Entity>, sort: &Sort) -> Select<todo_item::Entity> {
    let query = query.order_by(sort_column(sort.field), sort.direction.into());
    match sort.field {
        SortField::Id => query,
        _ => query.order_by(todo_item::Column::Id, sort.direction.into()),
    }
}

impl Todo {
    fn from_model(model: todo_item::Model, tasks: Vec<Task>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at.into(),
            tasks,
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C, sort: &Sort) -> Result<Vec<Self>, DbErr> {
        let records = apply_sort(todo_item::Entity::find(), sort).all(db).await?;

        let ids: Vec<i64> = records.iter().map(|model| model.id).collect();
        let mut tasks = Task::find_by_todo_ids(db, &ids).await?;

        Ok(records
            .into_iter()
            .map(|model| {
                let owned = tasks.remove(&model.id).unwrap_or_default();
                Self::from_model(model, owned)
            })
            .collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let Some(model) = todo_item::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        let tasks = Task::find_by_todo_id(db, id, &Sort::creation_order()).await?;
        Ok(Some(Self::from_model(model, tasks)))
    }

    pub async fn exists<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, DbErr> {
        let count = todo_item::Entity::find_by_id(id).count(db).await?;
        Ok(count > 0)
    }

    /// Inserts the todo row only; nested tasks are attached by the caller.
    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateTodo) -> Result<Self, DbErr> {
        let active = todo_item::ActiveModel {
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            completed: Set(data.completed),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model, Vec::new()))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateTodo,
    ) -> Result<Self, DbErr> {
        let record = todo_item::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("TodoItem not found".to_string()))?;

        let mut active: todo_item::ActiveModel = record.into();
        data.merge_into(&mut active);

        let updated = active.update(db).await?;
        let tasks = Task::find_by_todo_id(db, id, &Sort::creation_order()).await?;
        Ok(Self::from_model(updated, tasks))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        let result = todo_item::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::types::SortDirection;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn create_stamps_id_and_timestamp() {
        let db = setup_db().await;
        let before = Utc::now();

        let todo = Todo::create(&db, &CreateTodo::from_title("Groceries".to_string()))
            .await
            .unwrap();

        assert!(todo.id > 0);
        assert_eq!(todo.title, "Groceries");
        assert!(!todo.completed);
        assert!(todo.tasks.is_empty());
        assert!(todo.created_at >= before - chrono::Duration::seconds(1));
        assert!(Todo::exists(&db, todo.id).await.unwrap());
        assert!(!Todo::exists(&db, todo.id + 1).await.unwrap());
    }

    #[tokio::test]
    async fn find_by_id_includes_tasks_in_creation_order() {
        let db = setup_db().await;
        let todo = Todo::create(&db, &CreateTodo::from_title("Groceries".to_string()))
            .await
            .unwrap();
        for title in ["Milk", "Bread"] {
            Task::create(
                &db,
                todo.id,
                &CreateTask::from_title_description(title.to_string(), None),
            )
            .await
            .unwrap();
        }

        let loaded = Todo::find_by_id(&db, todo.id).await.unwrap().unwrap();
        let titles: Vec<_> = loaded.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Milk", "Bread"]);
        assert!(loaded.tasks.iter().all(|t| t.todo_item_id == todo.id));

        assert!(Todo::find_by_id(&db, todo.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_all_sorts_and_attaches_tasks() {
        let db = setup_db().await;
        let mut ids = Vec::new();
        for title in ["Beta", "Alpha", "Gamma"] {
            let todo = Todo::create(&db, &CreateTodo::from_title(title.to_string()))
                .await
                .unwrap();
            ids.push(todo.id);
        }
        Task::create(
            &db,
            ids[1],
            &CreateTask::from_title_description("Only task".to_string(), None),
        )
        .await
        .unwrap();

        let by_title = Todo::find_all(&db, &Sort::new(SortField::Title, SortDirection::Asc))
            .await
            .unwrap();
        let titles: Vec<_> = by_title.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "Beta", "Gamma"]);
        assert_eq!(by_title[0].tasks.len(), 1);
        assert!(by_title[1].tasks.is_empty());

        let newest_first = Todo::find_all(&db, &Sort::default()).await.unwrap();
        let titles: Vec<_> = newest_first.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Gamma", "Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn update_preserves_absent_fields() {
        let db = setup_db().await;
        let todo = Todo::create(
            &db,
            &CreateTodo {
                title: "Groceries".to_string(),
                description: Some("D".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let updated = Todo::update(
            &db,
            todo.id,
            &UpdateTodo {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Groceries");
        assert_eq!(updated.description.as_deref(), Some("D"));
        assert_eq!(updated.created_at, todo.created_at);
    }

    #[tokio::test]
    async fn delete_reports_rows_affected() {
        let db = setup_db().await;
        let todo = Todo::create(&db, &CreateTodo::from_title("Groceries".to_string()))
            .await
            .unwrap();

        assert_eq!(Todo::delete(&db, todo.id).await.unwrap(), 1);
        assert_eq!(Todo::delete(&db, todo.id).await.unwrap(), 0);
    }
}
