use std::collections::{BTreeSet, HashMap, HashSet};

use log::warn;

use crate::model::Graph;

/// Set/complex containment, stored once and walked in both directions.
///
/// Upward walks (member to enclosing sets) drive flag expansion; downward walks
/// (set to members) drive analysis aggregation. The source data does not
/// promise an acyclic relation, so every walk keeps a visited set.
#[derive(Debug, Default, Clone)]
pub struct Containment {
    parents: HashMap<i64, Vec<i64>>,
    members: HashMap<i64, Vec<i64>>,
}

impl Containment {
    pub fn new(graph: &Graph) -> Self {
        let mut containment = Self::default();
        for entity in &graph.nodes {
            for &parent in &entity.parents {
                containment.link(parent, entity.db_id);
            }
        }
        containment
    }

    fn link(&mut self, parent: i64, member: i64) {
        let parents = self.parents.entry(member).or_default();
        if parents.contains(&parent) {
            return;
        }
        parents.push(parent);
        self.members.entry(parent).or_default().push(member);
    }

    pub fn parents(&self, id: i64) -> &[i64] {
        self.parents.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn members(&self, id: i64) -> &[i64] {
        self.members.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `id` plus every set or complex that contains it, transitively.
    pub fn expand(&self, id: i64) -> BTreeSet<i64> {
        let mut found = BTreeSet::new();
        let mut path = HashSet::new();
        let mut cycle = false;
        self.expand_into(id, &mut path, &mut found, &mut cycle);
        if cycle {
            warn!("containment cycle reached while expanding {id}; graph data may be inconsistent");
        }
        found
    }

    fn expand_into(
        &self,
        id: i64,
        path: &mut HashSet<i64>,
        found: &mut BTreeSet<i64>,
        cycle: &mut bool,
    ) {
        if !path.insert(id) {
            *cycle = true;
            return;
        }
        if found.insert(id) {
            for &parent in self.parents(id) {
                self.expand_into(parent, path, found, cycle);
            }
        }
        path.remove(&id);
    }

    /// `id` followed by all of its members, transitively, in discovery order.
    /// Each entity is listed once.
    pub fn walk_members(&self, id: i64) -> Vec<i64> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut path = HashSet::new();
        let mut cycle = false;
        self.walk_into(id, &mut path, &mut seen, &mut order, &mut cycle);
        if cycle {
            warn!("containment cycle reached below {id}; graph data may be inconsistent");
        }
        order
    }

    fn walk_into(
        &self,
        id: i64,
        path: &mut HashSet<i64>,
        seen: &mut HashSet<i64>,
        order: &mut Vec<i64>,
        cycle: &mut bool,
    ) {
        if !path.insert(id) {
            *cycle = true;
            return;
        }
        if seen.insert(id) {
            order.push(id);
            for &member in self.members(id) {
                self.walk_into(member, path, seen, order, cycle);
            }
        }
        path.remove(&id);
    }

    /// Number of distinct leaf entities below `id`; an entity without members
    /// counts as its own single leaf.
    pub fn leaf_count(&self, id: i64) -> usize {
        let leaves = self
            .walk_members(id)
            .into_iter()
            .filter(|member| self.members(*member).is_empty())
            .count();
        leaves.max(1)
    }
}
