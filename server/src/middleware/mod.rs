//! Request extractors shared by the proxy handlers.

pub mod auth;
pub mod body;

pub use auth::{Credential, RequiredCredential};
pub use body::{JsonBody, OptionalJsonBody};
