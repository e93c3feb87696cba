//! Bookstall Online Bookstore
//!
//! A Rust implementation of the Bookstall online bookstore server,
//! providing a REST JSON API for browsing the catalog, placing purchase and
//! rental orders, and tracking payment.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
