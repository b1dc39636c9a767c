pub mod task;
pub mod todo_item;
