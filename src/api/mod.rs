//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod middleware;
pub mod router;
pub mod site;
pub mod state;
pub mod types;

pub use router::{create_router, create_router_with_state, RouterOptions};
pub use state::{AppState, RateLimits};
