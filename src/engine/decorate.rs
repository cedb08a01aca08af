use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;

use super::index::GraphIndex;
use crate::model::{DiagramObject, Edge};

/// Selection, halo and flag marks of one diagram object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoratedState {
    pub selected: bool,
    pub haloed: bool,
    pub flagged: bool,
}

/// Decoration of a whole diagram for one request, keyed by local object id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoration {
    states: HashMap<i64, DecoratedState>,
    selected: BTreeSet<i64>,
}

impl Decoration {
    /// State of an object; undecorated objects report all marks cleared.
    pub fn state(&self, id: i64) -> DecoratedState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    /// Local ids of the selected nodes and reactions.
    pub fn selected_ids(&self) -> &BTreeSet<i64> {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn select(&mut self, id: i64) {
        let state = self.states.entry(id).or_default();
        state.selected = true;
        state.haloed = true;
        self.selected.insert(id);
    }

    fn halo(&mut self, id: i64) {
        self.states.entry(id).or_default().haloed = true;
    }

    fn flag(&mut self, id: i64) {
        self.states.entry(id).or_default().flagged = true;
    }
}

/// Mark the objects of the indexed diagram that the selection and flag tokens
/// point at.
///
/// Selected nodes halo the reactions they connect to and every other
/// participant of those reactions; selected reactions halo their participants.
/// Flags also reach every set or complex that contains a flagged entity. Faded
/// objects are never decorated.
pub fn decorate<S, F>(index: &GraphIndex<'_>, selected: &[S], flags: &[F]) -> Decoration
where
    S: AsRef<str>,
    F: AsRef<str>,
{
    let selected: HashSet<i64> = index.resolve_all(selected).into_iter().collect();
    let flagged: HashSet<i64> = index
        .resolve_all(flags)
        .into_iter()
        .flat_map(|id| index.containment().expand(id))
        .collect();

    let mut decoration = Decoration::default();
    if selected.is_empty() && flagged.is_empty() {
        return decoration;
    }
    let diagram = index.diagram();

    for node in diagram.nodes.iter().filter(|node| !node.is_fade_out()) {
        if selected.contains(&node.reactome_id) {
            decoration.select(node.id);
            for connector in &node.connectors {
                let Some(reaction) = index.edge(connector.edge_id) else {
                    continue;
                };
                if !reaction.is_fade_out() {
                    decoration.halo(reaction.id);
                }
                halo_participants(index, reaction, &mut decoration);
            }
        }
        if flagged.contains(&node.reactome_id) {
            decoration.flag(node.id);
        }
    }

    for reaction in diagram.edges.iter().filter(|edge| !edge.is_fade_out()) {
        if selected.contains(&reaction.reactome_id) {
            decoration.select(reaction.id);
            halo_participants(index, reaction, &mut decoration);
        }
        if flagged.contains(&reaction.reactome_id) {
            decoration.flag(reaction.id);
        }
    }

    debug!(
        "decorated {} objects ({} selected) in {}",
        decoration.states.len(),
        decoration.selected.len(),
        diagram.stable_id
    );
    decoration
}

fn halo_participants(index: &GraphIndex<'_>, reaction: &Edge, decoration: &mut Decoration) {
    for part in reaction.participants() {
        if let Some(node) = index.node(part.id) {
            if !node.is_fade_out() {
                decoration.halo(node.id);
            }
        }
    }
}
