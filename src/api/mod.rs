//! Openfiles API request building and response handling.

pub mod client;
pub mod error;
pub(crate) mod response;

pub use client::{AUTH_HEADER, ApiClient, ApiToken};
pub use error::ValidationIssue;
