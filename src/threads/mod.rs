//! Thread listing: fetching every page and checking the listing order.

mod fetcher;
mod models;
mod order;

pub use fetcher::{FetchError, FetchOutcome, ThreadFetcher};
pub use models::*;
pub use order::{check_descending, OrderReport, OrderViolation};
