//! HTTP API for clip submission
//!
//! - POST /clips - Analyze one multipart clip upload, respond with the outcome
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::ErrorResponse;
pub use routes::create_router;
pub use state::AppState;
