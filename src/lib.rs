// src/lib.rs

pub mod common;
pub mod config;
pub mod handlers;
pub mod models;
pub mod platform;
pub mod services;

pub use common::error::AppError;
pub use config::{AppConfig, AppState};
pub use handlers::InvoiceWidget;
