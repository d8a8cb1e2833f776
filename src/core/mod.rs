//! Core business logic abstractions

pub mod cache;
pub mod chart;
pub mod config;
pub mod log;
pub mod market;
pub mod metrics;

// Re-export main types for cleaner imports
pub use cache::Cache;
pub use market::{HistoryProvider, HistoryRange, MetadataProvider, PriceBar, SymbolMetadata};
pub use metrics::{Aggregator, MetricsRow, MetricsTable, SortMetric};
