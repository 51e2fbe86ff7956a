//! Web layer for the transit dashboard.
//!
//! Serves the current dashboard state and the station list as JSON.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
