use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ExportError, Result};
use crate::profiles::Color;

pub const DEFAULT_QUALITY: u8 = 5;

/// Diagram units left blank around the drawing.
pub const MARGIN: f64 = 15.0;
/// Pixel area cap for single images.
pub const MAX_IMAGE_SIZE: f64 = 1e8;
/// Pixel area cap for one animated GIF frame.
pub const MAX_GIF_SIZE: f64 = 1e7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
    Svg,
}

impl OutputFormat {
    /// Formats that keep a transparent background.
    pub fn is_transparent(self) -> bool {
        matches!(self, Self::Png | Self::Svg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            "svg" => Ok(Self::Svg),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Svg => "svg",
        };
        f.write_str(name)
    }
}

/// Per request export options.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportArgs {
    pub format: OutputFormat,
    factor: f64,
    /// Background for formats without transparency.
    pub background: Color,
    /// Expression column shown by static images.
    pub column: usize,
    pub write_title: bool,
}

impl ExportArgs {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            factor: quality_factor(DEFAULT_QUALITY).unwrap_or(1.0),
            background: Color::WHITE,
            column: 0,
            write_title: false,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Result<Self> {
        self.factor = quality_factor(quality)?;
        Ok(self)
    }

    /// Scale from diagram units to pixels requested by the quality setting.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// Map quality 1..=10 onto a scale factor: 1..5 spans 0.1..1 and 5..10 spans 1..3.
pub fn quality_factor(quality: u8) -> Result<f64> {
    if !(1..=10).contains(&quality) {
        return Err(ExportError::QualityOutOfRange(quality));
    }
    let quality = f64::from(quality);
    Ok(if quality < 5.0 {
        interpolate(quality, 1.0, 5.0, 0.1, 1.0)
    } else {
        interpolate(quality, 5.0, 10.0, 1.0, 3.0)
    })
}

fn interpolate(x: f64, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> f64 {
    min_y + (x - min_x) * (max_y - min_y) / (max_x - min_x)
}
