// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod article;
pub mod config;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod news;
pub mod payout;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::article::{normalize, normalize_batch, Article, ContentType, RawArticle};
pub use crate::filter::FilterCriteria;
pub use crate::payout::{aggregate, count_by_type, PayoutRow, TypeCount};
