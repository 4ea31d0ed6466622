pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod runtime;
pub mod services;
