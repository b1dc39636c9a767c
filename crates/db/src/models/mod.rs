pub mod task;
pub mod todo;
