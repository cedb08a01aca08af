//! Small in-memory pathways for engine tests.

use crate::model::{
    Connector, ConnectorRole, Diagram, Edge, Graph, GraphEntity, GraphEvent, Node, NodeProperties,
    ReactionPart, RenderableKind,
};

pub fn node(id: i64, reactome_id: i64) -> Node {
    Node {
        id,
        reactome_id,
        display_name: format!("node {id}"),
        renderable_class: RenderableKind::Protein,
        prop: NodeProperties {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
        },
        is_fade_out: None,
        is_disease: None,
        is_crossed: None,
        need_dashed_border: None,
        connectors: Vec::new(),
    }
}

pub fn faded(mut node: Node) -> Node {
    node.is_fade_out = Some(true);
    node
}

pub fn parts(ids: &[i64]) -> Vec<ReactionPart> {
    ids.iter().map(|&id| ReactionPart { id }).collect()
}

pub fn edge(id: i64, reactome_id: i64, inputs: &[i64], outputs: &[i64], catalysts: &[i64]) -> Edge {
    Edge {
        id,
        reactome_id,
        display_name: format!("reaction {id}"),
        position: Default::default(),
        is_fade_out: None,
        is_disease: None,
        inputs: parts(inputs),
        outputs: parts(outputs),
        catalysts: parts(catalysts),
        activators: Vec::new(),
        inhibitors: Vec::new(),
        segments: Vec::new(),
    }
}

/// Build a diagram plus a matching graph. Every node gets an entity with
/// stable id `R-HSA-<reactomeId>`, every edge an event with the same scheme,
/// and nodes receive connectors for the reactions they take part in.
pub fn pathway(mut nodes: Vec<Node>, edges: Vec<Edge>) -> (Diagram, Graph) {
    for edge in &edges {
        let roles = [
            (&edge.inputs, ConnectorRole::Input),
            (&edge.outputs, ConnectorRole::Output),
            (&edge.catalysts, ConnectorRole::Catalyst),
            (&edge.activators, ConnectorRole::Activator),
            (&edge.inhibitors, ConnectorRole::Inhibitor),
        ];
        for (list, role) in roles {
            for part in list {
                if let Some(node) = nodes.iter_mut().find(|node| node.id == part.id) {
                    node.connectors.push(Connector {
                        edge_id: edge.id,
                        role,
                        segments: Vec::new(),
                    });
                }
            }
        }
    }
    let mut graph = Graph::default();
    for node in &nodes {
        if graph.nodes.iter().any(|entity| entity.db_id == node.reactome_id) {
            continue;
        }
        graph.nodes.push(GraphEntity {
            db_id: node.reactome_id,
            st_id: Some(format!("R-HSA-{}", node.reactome_id)),
            display_name: node.display_name.clone(),
            ..GraphEntity::default()
        });
    }
    for edge in &edges {
        graph.edges.push(GraphEvent {
            db_id: edge.reactome_id,
            st_id: Some(format!("R-HSA-{}", edge.reactome_id)),
            display_name: edge.display_name.clone(),
        });
    }
    let diagram = Diagram {
        stable_id: "R-HSA-0".to_string(),
        display_name: "test pathway".to_string(),
        nodes,
        edges,
        ..Diagram::default()
    };
    (diagram, graph)
}
