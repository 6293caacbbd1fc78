pub mod config;
pub mod state;
pub mod task;

pub use config::*;
pub use state::*;
pub use task::*;
