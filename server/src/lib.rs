//! Dramex Rate Server
//!
//! Thin HTTP layer over the rate service: one rates endpoint, a CSRF
//! token endpoint, and the CSRF guard protecting unsafe methods.

pub mod config;
pub mod csrf;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;
