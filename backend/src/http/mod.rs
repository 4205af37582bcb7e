//! HTTP server module for the MDA backend.
//!
//! Exposes the analytics engine as a REST API. The HTTP layer only parses
//! requests and serializes responses; all computation stays in the
//! service layer, and each request runs against its own immutable dataset
//! snapshot.

pub mod dto;

pub mod error;

pub mod handlers;

pub mod router;

pub mod state;

pub use router::create_router;
pub use state::AppState;
