// JMA Forecast Viewer - Core Library
// Exposes all modules for use in CLI, TUI, API server, and tests

pub mod weather_codes;  // Code → phrase table
pub mod area_catalog;   // centers/offices → sorted area list
pub mod forecast;       // Forecast JSON → display records
pub mod render;         // Display records → lines
pub mod config;
pub mod client;         // Blocking JMA retrieval
pub mod telemetry;

// Re-export commonly used types
pub use area_catalog::{build_catalog, AreaCatalog, AreaEntry, AreaKind};
pub use client::{load_catalog, load_forecast, FetchError, ForecastSource, JmaClient};
pub use crate::config::Config;
pub use forecast::{date_short, extract, parse_forecast_document, DisplayRecord, ForecastDocument};
pub use render::{render_lines, RenderedLine, Tone};
pub use weather_codes::describe;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
