//! `docqa-server` serves the "Talk to your data" assistant: a single HTML page
//! and a small JSON API over HTTP.

pub mod config;
pub mod protocol;
pub mod server;

pub use config::AppConfig;
pub use server::{AppState, StartupStatus, app_router, bootstrap, run_server};
