//! HTTP adapter for the public board and its notification subscriptions.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::public_board_router;
