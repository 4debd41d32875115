//! Client-side data layer for Fintrack frontends.
//!
//! Wraps the HTTP API in a typed client with a per-kind fetch cache,
//! and persists the UI-only preferences (currency, date range, premium
//! flag) between sessions. Rendering is someone else's job.

pub use api::{Client, ClientError, ReportDownload};
pub use cache::{EntityKind, FetchCache};
pub use config::{AppConfig, load, load_from};
pub use error::{AppError, Result};
pub use preferences::{
    DateRangeSelection, Preferences, PreferredCurrency, PremiumFlag, default_state_path,
};

mod api;
mod cache;
mod config;
pub mod display;
mod error;
mod preferences;
