//! Services for report extraction and aggregation

pub mod aggregator;
pub mod gateway;

pub use aggregator::Aggregator;
pub use gateway::{GeminiExtractor, ReportExtractor};
