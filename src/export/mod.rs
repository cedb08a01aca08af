//! Cairo drawing backend: PNG, JPEG, GIF, animated GIF and SVG.

mod args;
mod canvas;
mod geometry;
mod legend;
mod raster;
mod shapes;
mod text;

pub use args::{quality_factor, ExportArgs, OutputFormat, DEFAULT_QUALITY, MARGIN, MAX_GIF_SIZE, MAX_IMAGE_SIZE};
pub use canvas::Scene;
pub use geometry::{diagram_bounds, limit_factor, Bounds, PixelRect, Point, Transform};
pub use legend::{with_legend, LegendLayout};
pub use raster::{export_animated_gif, export_image};
