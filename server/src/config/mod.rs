//! Environment-driven configuration

mod backend;
mod client;
mod server;

pub use backend::BackendConfig;
pub use client::ClientConfig;
pub use server::ServerConfig;

/// Reads a variable, treating blank values as unset.
fn lookup(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
