use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Select, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    entities::task,
    types::{Sort, SortField},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[ts(type = "Date")]
    pub created_at: DateTime<Utc>,
    pub todo_item_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl CreateTask {
    pub fn from_title_description(title: String, description: Option<String>) -> Self {
        Self {
            title,
            description,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    /// Copies the fields present in the payload. `id`, `todo_item_id` and
    /// `created_at` are owned by the server and never written here.
    pub fn merge_into(&self, active: &mut task::ActiveModel) {
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

fn sort_column(field: SortField) -> task::Column {
    match field {
        SortField::Id => task::Column::Id,
        SortField::Title => task::Column::Title,
        SortField::Description => task::Column::Description,
        SortField::Completed => task::Column::Completed,
        SortField::CreatedAt => task::Column::CreatedAt,
    }
}

fn apply_sort(query: Select<task::Entity>, sort: &Sort) -> Select<task::Entity> {
    let query = query.order_by(sort_column(sort.field), sort.direction.into());
    match sort.field {
        SortField::Id => query,
        _ => query.order_by(task::Column::Id, sort.direction.into()),
    }
}

impl Task {
    pub(crate) fn from_model(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at.into(),
            todo_item_id: model.todo_item_id,
        }
    }

    pub async fn find_by_todo_id<C: ConnectionTrait>(
        db: &C,
        todo_id: i64,
        sort: &Sort,
    ) -> Result<Vec<Self>, DbErr> {
        let query = task::Entity::find().filter(task::Column::TodoItemId.eq(todo_id));
        let records = apply_sort(query, sort).all(db).await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Tasks for several todos in one query, grouped by owner in creation order.
    pub async fn find_by_todo_ids<C: ConnectionTrait>(
        db: &C,
        todo_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Self>>, DbErr> {
        if todo_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query =
            task::Entity::find().filter(task::Column::TodoItemId.is_in(todo_ids.to_vec()));
        let records = apply_sort(query, &Sort::creation_order()).all(db).await?;

        let mut grouped: HashMap<i64, Vec<Self>> = HashMap::with_capacity(todo_ids.len());
        for model in records {
            grouped
                .entry(model.todo_item_id)
                .or_default()
                .push(Self::from_model(model));
        }
        Ok(grouped)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = task::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    /// Resolves a task only when it belongs to `todo_id`.
    pub async fn find_by_id_and_todo_id<C: ConnectionTrait>(
        db: &C,
        task_id: i64,
        todo_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        let record = task::Entity::find()
            .filter(task::Column::Id.eq(task_id))
            .filter(task::Column::TodoItemId.eq(todo_id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        todo_id: i64,
        data: &CreateTask,
    ) -> Result<Self, DbErr> {
        let active = task::ActiveModel {
            todo_item_id: Set(todo_id),
            title: Set(data.title.clone()),
            description: Set(data.description.clone()),
            completed: Set(data.completed),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateTask,
    ) -> Result<Self, DbErr> {
        let record = task::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Task not found".to_string()))?;

        let mut active: task::ActiveModel = record.into();
        data.merge_into(&mut active);

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        let result = task::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_by_todo_id<C: ConnectionTrait>(db: &C, todo_id: i64) -> Result<u64, DbErr> {
        let result = task::Entity::delete_many()
            .filter(task::Column::TodoItemId.eq(todo_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::{
        models::todo::{CreateTodo, Todo},
        types::SortDirection,
    };

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn create_todo(db: &sea_orm::DatabaseConnection, title: &str) -> Todo {
        Todo::create(db, &CreateTodo::from_title(title.to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_links_task_to_todo() {
        let db = setup_db().await;
        let todo = create_todo(&db, "Groceries").await;

        let task = Task::create(
            &db,
            todo.id,
            &CreateTask::from_title_description("Milk".to_string(), Some("2 litres".to_string())),
        )
        .await
        .unwrap();

        assert_eq!(task.todo_item_id, todo.id);
        assert_eq!(task.title, "Milk");
        assert_eq!(task.description.as_deref(), Some("2 litres"));
        assert!(!task.completed);
        assert_eq!(Task::find_by_id(&db, task.id).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn scoped_lookup_requires_matching_owner() {
        let db = setup_db().await;
        let groceries = create_todo(&db, "Groceries").await;
        let chores = create_todo(&db, "Chores").await;
        let task = Task::create(
            &db,
            groceries.id,
            &CreateTask::from_title_description("Milk".to_string(), None),
        )
        .await
        .unwrap();

        let owned = Task::find_by_id_and_todo_id(&db, task.id, groceries.id)
            .await
            .unwrap();
        assert_eq!(owned.map(|t| t.id), Some(task.id));

        let foreign = Task::find_by_id_and_todo_id(&db, task.id, chores.id)
            .await
            .unwrap();
        assert!(foreign.is_none());
    }

    #[tokio::test]
    async fn find_by_todo_id_honours_sort() {
        let db = setup_db().await;
        let todo = create_todo(&db, "Groceries").await;
        for title in ["Bread", "Apples", "Cheese"] {
            Task::create(
                &db,
                todo.id,
                &CreateTask::from_title_description(title.to_string(), None),
            )
            .await
            .unwrap();
        }

        let by_title = Task::find_by_todo_id(
            &db,
            todo.id,
            &Sort::new(SortField::Title, SortDirection::Asc),
        )
        .await
        .unwrap();
        let titles: Vec<_> = by_title.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Apples", "Bread", "Cheese"]);

        let by_id_desc = Task::find_by_todo_id(
            &db,
            todo.id,
            &Sort::new(SortField::Id, SortDirection::Desc),
        )
        .await
        .unwrap();
        let titles: Vec<_> = by_id_desc.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Cheese", "Apples", "Bread"]);
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() {
        let db = setup_db().await;
        let todo = create_todo(&db, "Groceries").await;
        let task = Task::create(
            &db,
            todo.id,
            &CreateTask::from_title_description("Milk".to_string(), Some("D".to_string())),
        )
        .await
        .unwrap();

        let updated = Task::update(
            &db,
            task.id,
            &UpdateTask {
                title: Some("Oat milk".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Oat milk");
        assert_eq!(updated.description.as_deref(), Some("D"));
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.todo_item_id, todo.id);

        let toggled = Task::update(&db, task.id, &UpdateTask::completed(true))
            .await
            .unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.title, "Oat milk");
    }

    #[tokio::test]
    async fn update_missing_task_is_record_not_found() {
        let db = setup_db().await;
        let err = Task::update(&db, 404, &UpdateTask::completed(true))
            .await
            .unwrap_err();
        assert!(matches!(err, DbErr::RecordNotFound(_)));
    }

    #[tokio::test]
    async fn delete_by_todo_id_only_touches_that_todo() {
        let db = setup_db().await;
        let groceries = create_todo(&db, "Groceries").await;
        let chores = create_todo(&db, "Chores").await;
        for todo_id in [groceries.id, groceries.id, chores.id] {
            Task::create(
                &db,
                todo_id,
                &CreateTask::from_title_description("Item".to_string(), None),
            )
            .await
            .unwrap();
        }

        assert_eq!(Task::delete_by_todo_id(&db, groceries.id).await.unwrap(), 2);

        let grouped = Task::find_by_todo_ids(&db, &[groceries.id, chores.id])
            .await
            .unwrap();
        assert!(!grouped.contains_key(&groceries.id));
        assert_eq!(grouped.get(&chores.id).map(Vec::len), Some(1));
    }
}
