pub mod reset;
pub mod task_ops;
pub mod theme;
