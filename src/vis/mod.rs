//! Module providing data visualization functionality
//!
//! Charts are rendered to PNG or SVG files with plotters.

// Module structure
pub mod config;
#[cfg(feature = "visualization")]
pub mod plotters;

// Re-export public items
pub use self::config::{OutputType, PlotSettings};
#[cfg(feature = "visualization")]
pub use self::plotters::{plot_components, plot_forecast, plot_sales_trend};
