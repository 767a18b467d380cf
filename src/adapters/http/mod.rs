//! HTTP adapter - axum routers over the application services.
//!
//! Each bounded context has its own `dto` / `handlers` / `routes` module,
//! nested under its path prefix:
//!
//! | Prefix          | Module         |
//! |-----------------|----------------|
//! | `/events`       | `events`       |
//! | `/publishing`   | `publishing`   |
//! | `/preferences`  | `preferences`  |
//! | `/public-board` | `public_board` |
//!
//! Every handler returns `Result<_, ApiError>`; see [`error`] for the
//! status mapping.

pub mod error;
pub mod events;
pub mod middleware;
pub mod preferences;
pub mod public_board;
pub mod publishing;
pub mod state;

use axum::routing::get;
use axum::Router;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{CurrentUser, OptionalUser, USER_ID_HEADER};
pub use state::AppState;

/// Full API router with state applied. Transport layers (tracing, CORS,
/// timeouts) are added by the binary.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/events", events::event_router())
        .nest("/publishing", publishing::publishing_router())
        .nest("/preferences", preferences::preference_router())
        .nest("/public-board", public_board::public_board_router())
        .with_state(state)
}
