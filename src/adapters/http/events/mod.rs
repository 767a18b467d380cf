//! HTTP adapter for events and their membership.
//!
//! # Endpoints
//!
//! - `POST /events/create-personal-event`, `POST /events/create-campaign-event/{c}`
//! - `PATCH /events/update-*-event`, `DELETE /events/delete-*-event`
//! - participant add/remove by email, watcher add/remove for the caller
//! - `GET` event details, participants, campaign/personal/self listings

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::event_router;
