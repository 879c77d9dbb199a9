pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use client::{ClientError, PortalClient};
pub use config::ServerConfig;
pub use state::AppState;
