pub mod reminder;
pub mod task_ops;
pub mod view;
