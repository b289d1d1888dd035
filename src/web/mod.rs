//! Web API module.
//!
//! HTTP surface of the file service: JSON endpoints under `/api`, the
//! browser UI at `/`, static assets under `/static` and `/health`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
