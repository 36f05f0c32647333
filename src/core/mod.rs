//! Core price acquisition pipeline

pub mod aggregate;
pub mod asset;
pub mod config;
pub mod extract;
pub mod log;
pub mod quote;
pub mod rates;
pub mod refresh;
pub mod registry;
pub mod service;
pub mod source;
pub mod units;

// Re-export main types for cleaner imports
pub use asset::{Asset, AssetCategory};
pub use quote::{FailureReason, PriceMapping, Quote, RateMapping};
pub use service::PriceService;
pub use source::DocumentSource;
