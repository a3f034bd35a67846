//! Explicitly constructed state containers, one per entity family.
//!
//! Each container owns its slice of state behind a `tokio::sync::Mutex`,
//! is built from an injected [`CommerceClient`](crate::client::CommerceClient)
//! and hands out clones of its state through `snapshot`.

mod activity;
mod leaderboard;
mod list;
mod listings;
mod offers;
mod orders;
mod stores;

pub use activity::{ActivityFeed, ActivityFeedState};
pub use leaderboard::{LeaderboardBoard, LeaderboardState};
pub use list::{DetailSlot, DetailTicket, ListState, LoadOutcome, LoadTicket, PageRequest};
pub use listings::{ListingCatalog, ListingCatalogState, ListingFilters, SEARCH_FETCH_CAP};
pub use offers::{OfferBook, OfferBookState};
pub use orders::{OrderBook, OrderBookState};
pub use stores::{StoreDirectory, StoreDirectoryState};
