//! Configuration for chart rendering

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Plot output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// PNG image
    PNG,
    /// SVG format
    SVG,
}

impl OutputType {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputType::PNG => "png",
            OutputType::SVG => "svg",
        }
    }
}

impl Default for OutputType {
    fn default() -> Self {
        OutputType::PNG
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputType::PNG),
            "svg" => Ok(OutputType::SVG),
            other => Err(Error::ConfigurationError(format!(
                "Unknown output format '{}', expected png or svg",
                other
            ))),
        }
    }
}

/// Plot settings for file-rendered charts
#[derive(Debug, Clone)]
pub struct PlotSettings {
    /// Title
    pub title: String,
    /// X-axis label
    pub x_label: String,
    /// Y-axis label
    pub y_label: String,
    /// Width of the graph (pixels)
    pub width: u32,
    /// Height of the graph (pixels)
    pub height: u32,
    /// Output format
    pub output_type: OutputType,
    /// Show legend
    pub show_legend: bool,
    /// Show grid
    pub show_grid: bool,
    /// Color palette
    pub color_palette: Vec<(u8, u8, u8)>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            title: "Plot".to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            width: 1000,
            height: 600,
            output_type: OutputType::PNG,
            show_legend: true,
            show_grid: true,
            color_palette: vec![
                (0, 123, 255),  // Blue
                (255, 99, 71),  // Red
                (46, 204, 113), // Green
                (255, 193, 7),  // Yellow
                (142, 68, 173), // Purple
            ],
        }
    }
}

impl PlotSettings {
    /// Copy with a new title and axis labels
    pub fn titled(&self, title: &str, x_label: &str, y_label: &str) -> PlotSettings {
        PlotSettings {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            ..self.clone()
        }
    }

    /// Palette entry `index`, wrapping around; black when the palette is empty
    pub fn color(&self, index: usize) -> (u8, u8, u8) {
        if self.color_palette.is_empty() {
            (0, 0, 0)
        } else {
            self.color_palette[index % self.color_palette.len()]
        }
    }
}
