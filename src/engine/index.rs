use std::collections::{HashMap, HashSet};

use super::membership::Containment;
use crate::model::{Diagram, DiagramObject, Edge, Graph, Node};

/// A diagram object looked up by its local id.
#[derive(Clone, Copy, Debug)]
pub enum ObjectRef<'a> {
    Node(&'a Node),
    Edge(&'a Edge),
}

impl<'a> ObjectRef<'a> {
    pub fn as_node(self) -> Option<&'a Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(self) -> Option<&'a Edge> {
        match self {
            Self::Edge(edge) => Some(edge),
            Self::Node(_) => None,
        }
    }

    pub fn is_fade_out(self) -> bool {
        match self {
            Self::Node(node) => node.is_fade_out(),
            Self::Edge(edge) => edge.is_fade_out(),
        }
    }
}

/// Per-request lookup tables over a diagram and its pathway graph.
pub struct GraphIndex<'a> {
    diagram: &'a Diagram,
    graph: &'a Graph,
    entities: HashSet<i64>,
    reactions: HashSet<i64>,
    objects: HashMap<i64, ObjectRef<'a>>,
    containment: Containment,
}

impl<'a> GraphIndex<'a> {
    pub fn new(diagram: &'a Diagram, graph: &'a Graph) -> Self {
        let entities = graph.nodes.iter().map(|entity| entity.db_id).collect();
        let reactions = graph.edges.iter().map(|event| event.db_id).collect();
        let objects = diagram
            .edges
            .iter()
            .map(|edge| (edge.id, ObjectRef::Edge(edge)))
            .chain(diagram.nodes.iter().map(|node| (node.id, ObjectRef::Node(node))))
            .collect();
        Self {
            diagram,
            graph,
            entities,
            reactions,
            objects,
            containment: Containment::new(graph),
        }
    }

    pub fn diagram(&self) -> &'a Diagram {
        self.diagram
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn is_entity(&self, db_id: i64) -> bool {
        self.entities.contains(&db_id)
    }

    pub fn is_reaction(&self, db_id: i64) -> bool {
        self.reactions.contains(&db_id)
    }

    pub fn object(&self, id: i64) -> Option<ObjectRef<'a>> {
        self.objects.get(&id).copied()
    }

    pub fn node(&self, id: i64) -> Option<&'a Node> {
        self.object(id).and_then(ObjectRef::as_node)
    }

    pub fn edge(&self, id: i64) -> Option<&'a Edge> {
        self.object(id).and_then(ObjectRef::as_edge)
    }

    pub fn containment(&self) -> &Containment {
        &self.containment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{edge, node, pathway};

    #[test]
    fn empty_inputs_give_empty_indices() {
        let diagram = Diagram::default();
        let graph = Graph::default();
        let index = GraphIndex::new(&diagram, &graph);
        assert!(index.object(1).is_none());
        assert!(!index.is_entity(1));
        assert!(!index.is_reaction(1));
    }

    #[test]
    fn nodes_and_edges_share_the_local_id_space() {
        let (diagram, graph) = pathway(
            vec![node(1, 101), node(2, 102)],
            vec![edge(3, 900, &[1], &[2], &[])],
        );
        let index = GraphIndex::new(&diagram, &graph);
        assert_eq!(index.node(1).map(|n| n.reactome_id), Some(101));
        assert_eq!(index.edge(3).map(|e| e.reactome_id), Some(900));
        assert!(index.node(3).is_none());
        assert!(index.edge(1).is_none());
        assert!(index.is_entity(102));
        assert!(index.is_reaction(900));
        assert!(!index.is_reaction(101));
    }
}
