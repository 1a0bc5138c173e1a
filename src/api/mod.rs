//! # Backend API
//!
//! The query backend is an opaque service reached over HTTP:
//!
//! - `GET /api/query?q=<text>` → `{ "response": "<text>" }`
//! - `GET /api/` → `{ "status": "ok", "message": "..." }`
//!
//! Everything else the UI needs from the backend goes through the traits in
//! [`service`], so tests can swap in scripted implementations.

pub mod client;
pub mod service;
pub mod types;

pub use client::HttpQueryService;
pub use service::{FileActions, QueryService, ServiceError, UnimplementedFileActions};
pub use types::{HealthResponse, QueryResponse};
