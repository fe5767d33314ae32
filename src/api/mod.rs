//! JSON API under `/api/v1`.
//!
//! Every response body has the shape `{"response": ...}`, carrying either the
//! payload or a human-readable message.

mod error;
pub mod links;
pub mod public;
pub mod session;
pub mod users;

pub use error::ApiError;
