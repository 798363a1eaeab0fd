//! # Margin Analytics Engine
//!
//! This crate turns a set of dated revenue/expense records into the numbers a business
//! dashboard shows: totals and growth, a short linear-trend forecast, and an insights
//! report with growth, margin and a plain-language health label.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of HTTP, files
//!   or configuration. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` holds no state. It takes a snapshot
//!   slice of records and returns freshly allocated value objects, so it can be shared
//!   freely between concurrent requests.
//! - **Validated Input:** Records are validated when they are built (see
//!   `core_types::Record`). The engine only reports problems with the *shape* of the
//!   data set, such as too few points or a bad horizon.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: `summarize`, `forecast` and `insights`.
//! - `Summary`, `Forecast`, `Insights`: the serializable results.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, GROWTH_EPSILON, MAX_HORIZON};
pub use error::AnalyticsError;
pub use report::{
    BusinessHealth, Forecast, ForecastPoint, GrowthRate, Insights, PeakRevenue, Suggestion,
    Summary,
};
pub use trend::Trend;
