#![allow(dead_code)]

use std::path::{Path, PathBuf};

use render_pathway_rs::model::{
    load_analysis, load_diagram, load_graph, AnalysisResult, Diagram, Graph,
};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn pathway() -> (Diagram, Graph) {
    let diagram = load_diagram(&fixture("diagram.json")).unwrap();
    let graph = load_graph(&fixture("graph.json")).unwrap();
    (diagram, graph)
}

pub fn analysis(name: &str) -> AnalysisResult {
    load_analysis(&fixture(name)).unwrap()
}

/// Scratch file in the system temp directory, unique per test process.
pub fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("render_pathway_rs_{}_{name}", std::process::id()))
}
