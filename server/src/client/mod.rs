//! Client side of the storefront: the transport seam, the typed commerce
//! API that sits on it, and the query parameter types.

mod api;
mod query;
mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use api::CommerceClient;
pub use query::{ListingQuery, OfferQuery, OrderQuery, PageParams};
pub use transport::{ApiRequest, HttpTransport, Transport};
