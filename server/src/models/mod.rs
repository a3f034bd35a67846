//! Data models for the storefront: camelCase view models, the backend's
//! flat wire records, and the write forms.

mod commerce;
mod forms;
mod wire;

pub use commerce::*;
pub use forms::*;
pub use wire::{WireListing, WireStore};

/// Entities that can be located by identity inside cached lists.
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified!(Store, Product, Listing, Offer, Order, Review, ActivityEvent, TrustEvent, LookingForItem);
