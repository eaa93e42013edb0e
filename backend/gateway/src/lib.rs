//! PRINIX HTTP gateway
//!
//! Landing page, the `/ask` endpoint with cookie-backed sessions, static
//! assets, and health reporting.

pub mod health_api;
pub mod landing;
pub mod server;
pub mod session;

pub use server::{build_router, serve, AppState, Deployment};
