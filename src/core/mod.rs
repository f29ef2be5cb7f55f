//! Core business logic abstractions

pub mod chart;
pub mod config;
pub mod extract;
pub mod log;
pub mod page;
pub mod pipeline;
pub mod price;
pub mod revenue;

// Re-export main types for cleaner imports
pub use chart::{ChartOutput, ChartSize, ChartWindow};
pub use extract::TableSelector;
pub use page::PageFetcher;
pub use price::{PriceHistoryProvider, PriceRecord, PriceSeries};
pub use revenue::{RevenueRecord, RevenueSeries};
