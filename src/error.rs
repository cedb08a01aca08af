use std::path::PathBuf;

/// Errors raised while loading inputs or writing exported images.
///
/// The decoration and overlay engine itself never fails; everything here comes
/// from file access, parsing, configuration or the drawing backends.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("embedded profile is malformed")]
    EmbeddedProfile(#[source] serde_json::Error),
    #[error("failed to parse EHLD SVG")]
    Svg(#[from] roxmltree::Error),
    #[error("unsupported output format '{0}'")]
    UnsupportedFormat(String),
    #[error("quality must be in the range [1-10], got {0}")]
    QualityOutOfRange(u8),
    #[error("expression column {column} out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
    #[error("only EXPRESSION analysis can be rendered into animated GIFs")]
    NotExpression,
    #[error("invalid color '{0}'")]
    InvalidColor(String),
    #[error("cairo drawing failed")]
    Cairo(#[from] cairo::Error),
    #[error("failed to write PNG")]
    Png(#[from] cairo::IoError),
    #[error("image surface is still borrowed by a drawing context")]
    SurfaceBorrow,
    #[error("failed to encode image")]
    Encode(#[from] image::ImageError),
    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
