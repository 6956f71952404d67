//! TickMyPax tour operations server
//!
//! REST JSON API for a tour operator's back office: spreadsheet imports of
//! passenger bookings with archiving, guide check-in, the tour-guide
//! directory, completed-tour statistics and passenger manifest exports.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod spreadsheet;

pub use api::create_router;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
