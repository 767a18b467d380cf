//! HTTP adapter for per-user campaign preferences.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::preference_router;
