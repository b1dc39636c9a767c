use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoItems::Table)
                    .if_not_exists()
                    .col(pk_id_col(manager, TodoItems::Id))
                    .col(ColumnDef::new(TodoItems::Title).string_len(255).not_null())
                    .col(ColumnDef::new(TodoItems::Description).text())
                    .col(completed_col(TodoItems::Completed))
                    .col(timestamp_col(TodoItems::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(pk_id_col(manager, Tasks::Id))
                    .col(fk_id_col(manager, Tasks::TodoItemId))
                    .col(ColumnDef::new(Tasks::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Tasks::Description).text())
                    .col(completed_col(Tasks::Completed))
                    .col(timestamp_col(Tasks::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_todo_item_id")
                            .from(Tasks::Table, Tasks::TodoItemId)
                            .to(TodoItems::Table, TodoItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_todo_item_id")
                    .table(Tasks::Table)
                    .col(Tasks::TodoItemId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TodoItems::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn fk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().to_owned()
}

fn completed_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum TodoItems {
    Table,
    Id,
    Title,
    Description,
    Completed,
    CreatedAt,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    TodoItemId,
    Title,
    Description,
    Completed,
    CreatedAt,
}
