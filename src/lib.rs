pub mod auth;
pub mod cli;
pub mod config;
pub mod datasets;
pub mod handlers;
pub mod state;
pub mod storage;

pub use config::ServerConfig;
pub use state::ServerState;
