pub mod api;
pub mod config;
pub mod error;
pub mod mailerlite;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
