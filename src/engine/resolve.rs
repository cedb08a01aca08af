use log::debug;

use super::index::GraphIndex;

impl<'a> GraphIndex<'a> {
    /// Resolve a selection or flag token to an entity or reaction database id.
    ///
    /// Numeric ids are looked up directly. Anything else is matched, case
    /// insensitively, against entity stable ids, identifiers and gene names and
    /// then against reaction stable ids, in stored order. Lists are a handful
    /// of user tokens, so the linear scan is fine.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Ok(db_id) = token.parse::<i64>() {
            if self.is_entity(db_id) || self.is_reaction(db_id) {
                return Some(db_id);
            }
        }
        let same = |candidate: Option<&str>| {
            candidate.is_some_and(|candidate| candidate.eq_ignore_ascii_case(token))
        };
        let graph = self.graph();
        let entity = graph.nodes.iter().find(|entity| {
            same(entity.st_id.as_deref())
                || same(entity.identifier.as_deref())
                || entity
                    .gene_names
                    .iter()
                    .any(|gene| gene.eq_ignore_ascii_case(token))
        });
        if let Some(entity) = entity {
            return Some(entity.db_id);
        }
        let event = graph
            .edges
            .iter()
            .find(|event| same(event.st_id.as_deref()));
        if event.is_none() {
            debug!("token '{token}' matches nothing in the graph");
        }
        event.map(|event| event.db_id)
    }

    /// Resolve every token, silently dropping the ones that match nothing.
    pub fn resolve_all<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<i64> {
        tokens
            .iter()
            .filter_map(|token| self.resolve(token.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::engine::test_support::{edge, node, pathway};
    use crate::engine::GraphIndex;
    use crate::model::{Diagram, Graph};

    fn fixture() -> (Diagram, Graph) {
        let (diagram, mut graph) = pathway(
            vec![node(1, 101), node(2, 102), node(3, 103)],
            vec![edge(10, 900, &[1], &[2], &[3])],
        );
        graph.nodes[0].identifier = Some("P04637".to_string());
        graph.nodes[0].gene_names = vec!["TP53".to_string(), "P53".to_string()];
        graph.nodes[1].identifier = Some("CHEBI:15422".to_string());
        graph.nodes[2].gene_names = vec!["MDM2".to_string()];
        (diagram, graph)
    }

    #[rstest]
    #[case("101", Some(101))]
    #[case("900", Some(900))]
    #[case(" 102 ", Some(102))]
    #[case("R-HSA-103", Some(103))]
    #[case("r-hsa-103", Some(103))]
    #[case("p04637", Some(101))]
    #[case("chebi:15422", Some(102))]
    #[case("tp53", Some(101))]
    #[case("MDM2", Some(103))]
    #[case("R-HSA-900", Some(900))]
    #[case("12345", None)]
    #[case("BRCA1", None)]
    #[case("", None)]
    fn resolves_tokens_in_precedence_order(#[case] token: &str, #[case] expected: Option<i64>) {
        let (diagram, graph) = fixture();
        let index = GraphIndex::new(&diagram, &graph);
        assert_eq!(index.resolve(token), expected);
    }

    #[test]
    fn first_entity_in_stored_order_wins() {
        let (diagram, mut graph) = fixture();
        graph.nodes[2].gene_names.push("TP53".to_string());
        let index = GraphIndex::new(&diagram, &graph);
        assert_eq!(index.resolve("TP53"), Some(101));
    }

    #[test]
    fn entities_are_matched_before_reactions() {
        let (diagram, mut graph) = fixture();
        graph.nodes[1].identifier = Some("R-HSA-900".to_string());
        let index = GraphIndex::new(&diagram, &graph);
        assert_eq!(index.resolve("R-HSA-900"), Some(102));
    }

    #[test]
    fn unresolved_tokens_are_dropped() {
        let (diagram, graph) = fixture();
        let index = GraphIndex::new(&diagram, &graph);
        let ids = index.resolve_all(&["nope", "101", "also-nope", "MDM2"]);
        assert_eq!(ids, vec![101, 103]);
    }
}
