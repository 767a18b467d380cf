//! HTTP adapter for event publication and board announcements.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::publishing_router;
