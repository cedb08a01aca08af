//! Parsed inputs: diagram layout, pathway graph and analysis result.

mod analysis;
mod graph;
mod layout;

use std::fs;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

pub use analysis::{
    AnalysisKind, AnalysisResult, ExpressionSummary, FoundEntity, PathwayEntities, PathwaySummary,
};
pub use graph::{Graph, GraphEntity, GraphEvent};
pub use layout::{
    Compartment, Connector, ConnectorRole, Coordinate, Diagram, DiagramObject, Edge, Node,
    NodeProperties, Note, ReactionPart, RenderableKind, Segment,
};

use crate::error::{ExportError, Result};

pub fn load_diagram(path: &Path) -> Result<Diagram> {
    read_json(path)
}

pub fn load_graph(path: &Path) -> Result<Graph> {
    read_json(path)
}

pub fn load_analysis(path: &Path) -> Result<AnalysisResult> {
    read_json(path)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })
}
