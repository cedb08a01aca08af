use super::binder::AnalysisBinding;
use super::decorate::Decoration;
use super::overlay::expression_scale;
use crate::model::AnalysisKind;

/// Mark on the expression legend for one measured value of a selected node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendTick {
    pub node_id: i64,
    pub value: f64,
    /// Position along the legend gradient: 0 at the max end, 1 at the min end.
    pub scale: f64,
}

/// Values of the selected nodes in one expression column, in node id order.
/// Only expression results carry a value legend.
pub fn legend_ticks(
    decoration: &Decoration,
    binding: &AnalysisBinding<'_>,
    column: usize,
) -> Vec<LegendTick> {
    if binding.kind() != AnalysisKind::Expression {
        return Vec::new();
    }
    let (min, max) = binding.range();
    decoration
        .selected_ids()
        .iter()
        .filter_map(|&id| binding.hits(id).map(|hits| (id, hits)))
        .flat_map(|(node_id, hits)| {
            hits.values(column)
                .into_iter()
                .flatten()
                .map(move |value| LegendTick {
                    node_id,
                    value,
                    scale: expression_scale(value, min, max),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{edge, node, pathway};
    use crate::engine::{bind, decorate, GraphIndex};
    use crate::model::{AnalysisResult, ExpressionSummary, FoundEntity};

    const NONE: [&str; 0] = [];

    fn expression(rows: Vec<FoundEntity>) -> AnalysisResult {
        AnalysisResult {
            analysis_type: Some("EXPRESSION".to_string()),
            expression: Some(ExpressionSummary {
                min: Some(0.0),
                max: Some(10.0),
                column_names: vec!["t0".to_string(), "t1".to_string()],
            }),
            entities: rows,
            ..AnalysisResult::default()
        }
    }

    fn row(id: i64, exp: &[Option<f64>]) -> FoundEntity {
        FoundEntity {
            id,
            exp: exp.to_vec(),
        }
    }

    #[test]
    fn selected_nodes_mark_their_column_values() {
        let (diagram, graph) = pathway(
            vec![node(1, 101), node(2, 102)],
            vec![edge(10, 500, &[1], &[2], &[])],
        );
        let index = GraphIndex::new(&diagram, &graph);
        let analysis = expression(vec![
            row(101, &[Some(2.0), Some(8.0)]),
            row(102, &[Some(5.0), Some(5.0)]),
        ]);
        let binding = bind(&index, Some(&analysis));
        let decoration = decorate(&index, &["R-HSA-101"], &NONE);

        let first = legend_ticks(&decoration, &binding, 0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].node_id, 1);
        assert_eq!(first[0].value, 2.0);
        assert!((first[0].scale - 0.8).abs() < 1e-9);
        let second = legend_ticks(&decoration, &binding, 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].value, 8.0);
        assert!((second[0].scale - 0.2).abs() < 1e-9);
    }

    #[test]
    fn missing_cells_and_unselected_nodes_leave_no_mark() {
        let (diagram, graph) = pathway(vec![node(1, 101), node(2, 102)], vec![]);
        let index = GraphIndex::new(&diagram, &graph);
        let analysis = expression(vec![row(101, &[None, Some(1.0)]), row(102, &[Some(3.0)])]);
        let binding = bind(&index, Some(&analysis));
        let decoration = decorate(&index, &["R-HSA-101"], &NONE);

        assert!(legend_ticks(&decoration, &binding, 0).is_empty());
        assert_eq!(legend_ticks(&decoration, &binding, 1).len(), 1);
    }

    #[test]
    fn enrichment_results_have_no_value_legend() {
        let (diagram, graph) = pathway(vec![node(1, 101)], vec![]);
        let index = GraphIndex::new(&diagram, &graph);
        let analysis = AnalysisResult {
            analysis_type: Some("OVERREPRESENTATION".to_string()),
            entities: vec![row(101, &[])],
            ..AnalysisResult::default()
        };
        let binding = bind(&index, Some(&analysis));
        let decoration = decorate(&index, &["R-HSA-101"], &NONE);
        assert!(legend_ticks(&decoration, &binding, 0).is_empty());
    }
}
