//! Social API
//!
//! REST backend for a small social network: accounts, posts with `@mentions`,
//! likes, comments and a follow graph.

pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod logging;
pub mod repository;
pub mod security;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
