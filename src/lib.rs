//! Pathway diagram exporter.
//!
//! Diagrams are drawn from a precomputed layout, decorated with the user's
//! selection and flags, and overlaid with enrichment or expression analysis
//! results before being written as PNG, JPEG, GIF, animated GIF or SVG.
//! Enhanced high-level diagrams (EHLD) are decorated in place as SVG text.

pub mod ehld;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod profiles;

pub use error::{ExportError, Result};
pub use model::{load_analysis, load_diagram, load_graph};
pub use profiles::load_profiles;
