pub mod config_io;
pub mod debounce;
pub mod state;
pub mod store;
