//! Pilot Inventory: finding lodging, dining and sightseeing options within budget
//!
//! ```text
//! InventoryQuery ──► Inventory (HttpInventory | StaticInventory)
//!                        │ raw listings
//!                        ▼
//!                   normalizer ──► CandidateItem
//!                        │
//!                        ▼
//!              InventoryMatcher: filter ► score ► rank ► truncate ──► MatchOutcome
//! ```
//!
//! The matcher asks the inventory at most twice. When a location-scoped
//! request finds nothing, or fails outright, it retries once without the
//! location and marks the outcome `fallbackUsed`.

pub mod candidate;
pub mod error;
pub mod http;
pub mod matcher;
pub mod memory;
pub mod normalizer;
pub mod source;

pub use candidate::{CandidateItem, RankedCandidate};
pub use error::InventoryError;
pub use http::HttpInventory;
pub use matcher::{
    InventoryMatcher, MatchFilters, MatchOutcome, RankMode, DEFAULT_RECOMMENDATION_LIMIT,
};
pub use memory::StaticInventory;
pub use normalizer::{normalize_listings, parse_listings, RawListing};
pub use source::{Inventory, InventoryQuery};
