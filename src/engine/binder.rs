use std::collections::HashMap;

use log::debug;

use super::index::GraphIndex;
use crate::model::{AnalysisKind, AnalysisResult, FoundEntity};

/// Analysis rows that land on one diagram node.
#[derive(Clone, Debug, Default)]
pub struct NodeHits<'r> {
    rows: Vec<&'r FoundEntity>,
    total: usize,
}

impl<'r> NodeHits<'r> {
    pub fn new(rows: Vec<&'r FoundEntity>, total: usize) -> Self {
        let total = total.max(rows.len());
        Self { rows, total }
    }

    /// Rows in member discovery order.
    pub fn rows(&self) -> &[&'r FoundEntity] {
        &self.rows
    }

    /// Number of members the glyph stands for, measured or not.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fraction of represented members found by an enrichment analysis.
    pub fn enrichment(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.rows.len() as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    /// Values of one expression column, aligned with `rows`.
    pub fn values(&self, column: usize) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.value(column)).collect()
    }
}

/// An analysis result bound to the nodes of one diagram.
#[derive(Clone, Debug)]
pub struct AnalysisBinding<'r> {
    kind: AnalysisKind,
    hits: HashMap<i64, NodeHits<'r>>,
    range: (f64, f64),
    columns: Vec<String>,
    column_count: usize,
}

impl Default for AnalysisBinding<'_> {
    fn default() -> Self {
        Self {
            kind: AnalysisKind::None,
            hits: HashMap::new(),
            range: (0.0, 0.0),
            columns: Vec::new(),
            column_count: 0,
        }
    }
}

impl<'r> AnalysisBinding<'r> {
    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_active()
    }

    /// Hits bound to a node, by local id. Nodes without rows have none.
    pub fn hits(&self, node_id: i64) -> Option<&NodeHits<'r>> {
        self.hits.get(&node_id).filter(|hits| !hits.is_empty())
    }

    /// Expression min and max over the whole result.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Name of an expression column, if the result carries one.
    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }
}

/// Bind an analysis result to every node of the indexed diagram.
///
/// Simple glyphs only see their own entity's row. Sets and complexes collect
/// the rows of every member below them, in discovery order, and count all
/// their leaf members when sizing segments.
pub fn bind<'r>(index: &GraphIndex<'_>, analysis: Option<&'r AnalysisResult>) -> AnalysisBinding<'r> {
    let Some(analysis) = analysis else {
        return AnalysisBinding::default();
    };
    let kind = analysis.kind();
    if !kind.is_active() {
        return AnalysisBinding::default();
    }

    let mut rows: HashMap<i64, &'r FoundEntity> = HashMap::new();
    for entity in &analysis.entities {
        rows.entry(entity.id).or_insert(entity);
    }

    let containment = index.containment();
    let mut hits = HashMap::new();
    for node in &index.diagram().nodes {
        let node_hits = if node.renderable_class.aggregates_members() {
            let found = containment
                .walk_members(node.reactome_id)
                .into_iter()
                .filter_map(|id| rows.get(&id).copied())
                .collect();
            NodeHits::new(found, containment.leaf_count(node.reactome_id))
        } else {
            let found: Vec<_> = rows.get(&node.reactome_id).copied().into_iter().collect();
            NodeHits::new(found, 1)
        };
        if !node_hits.is_empty() {
            hits.insert(node.id, node_hits);
        }
    }
    debug!(
        "bound {:?} analysis to {} of {} nodes",
        kind,
        hits.len(),
        index.diagram().nodes.len()
    );

    AnalysisBinding {
        kind,
        hits,
        range: analysis.value_range(),
        columns: analysis.column_names().to_vec(),
        column_count: analysis.column_count(),
    }
}
