//! Axum HTTP server handler and router for the device redirect handoff.

pub mod context;
mod handler_alldone;
pub mod server;

pub use context::{AppEngine, AppState};
pub use handler_alldone::handle_alldone;
pub use server::build_router;
