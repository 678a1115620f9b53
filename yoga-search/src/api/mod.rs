//! HTTP API handlers for yoga-search

pub mod health;
pub mod identity;
pub mod me;
pub mod search;

pub use health::health_routes;
pub use identity::Caller;
pub use me::{erasure_plan, export_my_data};
pub use search::{search_asanas, search_sequences, search_series};
