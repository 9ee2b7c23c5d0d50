use crate::node::{NodeId, TaxonomyNode};
use petgraph::graph::DiGraph;
use petgraph::visit::Dfs;
use petgraph::Direction;
use std::collections::BTreeSet;
use std::ops::Index;

/// Row of the tree as a display layer shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
}

/// Finalized classification tree.
///
/// Counts and aggregates are frozen; only the display expansion state can
/// still change.
#[derive(Debug, Clone)]
pub struct Taxonomy<P> {
    graph: DiGraph<TaxonomyNode<P>, ()>,
    root: NodeId,
}

impl<P> Taxonomy<P> {
    pub(crate) fn from_parts(graph: DiGraph<TaxonomyNode<P>, ()>, root: NodeId) -> Self {
        Self { graph, root }
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&TaxonomyNode<P>> {
        self.graph.node_weight(id)
    }

    /// Children in display order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(TaxonomyNode::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.graph.neighbors_directed(id, Direction::Incoming).next()
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() <= 1
    }

    /// `id` followed by its ancestors up to, but not including, the root
    pub fn lineage(&self, id: NodeId) -> Lineage<'_, P> {
        Lineage {
            taxonomy: self,
            next: Some(id).filter(|&id| id != self.root && self.node(id).is_some()),
        }
    }

    /// Nodes from the first level below the root down to `id`
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.lineage(id).collect();
        path.reverse();
        path
    }

    /// Distance from the root (the root itself is at depth 0)
    pub fn depth(&self, id: NodeId) -> usize {
        self.lineage(id).count()
    }

    /// Whether `id` or one of its ancestors is in `nodes`
    pub fn is_self_or_descendant_of(&self, id: NodeId, nodes: &BTreeSet<NodeId>) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if nodes.contains(&node) {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Ids of the given nodes; nodes without an id are skipped
    pub fn ids_of<'a>(&self, selection: impl IntoIterator<Item = &'a NodeId>) -> BTreeSet<String> {
        selection
            .into_iter()
            .filter_map(|&id| self.node(id)?.id())
            .map(str::to_string)
            .collect()
    }

    /// Every node whose id is in `ids`; unknown ids resolve to nothing
    pub fn resolve_ids(&self, ids: &BTreeSet<String>) -> BTreeSet<NodeId> {
        let mut resolved = BTreeSet::new();
        if ids.is_empty() {
            return resolved;
        }
        let mut dfs = Dfs::new(&self.graph, self.root);
        while let Some(id) = dfs.next(&self.graph) {
            if self.graph[id].id().is_some_and(|node_id| ids.contains(node_id)) {
                resolved.insert(id);
            }
        }
        resolved
    }

    /// Node ids of the subtree under `id` in pre-order, `id` first
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Expand or collapse branches.
    ///
    /// With no targets the whole tree is expanded, or collapsed back to only
    /// the root being open. Otherwise each target's subtree is updated.
    pub fn expand_or_collapse(&mut self, targets: &BTreeSet<NodeId>, expand: bool) {
        if targets.is_empty() {
            for node in self.graph.node_weights_mut() {
                node.expanded = expand && node.branch;
            }
            if !expand {
                self.graph[self.root].expanded = true;
            }
            return;
        }

        for &target in targets {
            if self.node(target).is_none() {
                continue;
            }
            for id in self.descendants(target) {
                let node = &mut self.graph[id];
                node.expanded = expand && node.branch;
            }
        }
    }

    /// Open every ancestor of `id` so the node itself becomes a visible row
    pub fn reveal(&mut self, id: NodeId) {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            self.graph[parent].expanded = true;
            current = self.parent(parent);
        }
    }

    /// Pre-order rows visible under the current expansion state, root first
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack = vec![TreeRow {
            id: self.root,
            depth: 0,
        }];
        while let Some(row) = stack.pop() {
            rows.push(row);
            let node = &self.graph[row.id];
            if node.expanded {
                stack.extend(node.children.iter().rev().map(|&id| TreeRow {
                    id,
                    depth: row.depth + 1,
                }));
            }
        }
        rows
    }
}

impl<P> Index<NodeId> for Taxonomy<P> {
    type Output = TaxonomyNode<P>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.graph[id]
    }
}

/// Iterator over a node and its ancestors, leaf side first, root excluded
pub struct Lineage<'a, P> {
    taxonomy: &'a Taxonomy<P>,
    next: Option<NodeId>,
}

impl<P> Iterator for Lineage<'_, P> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self
            .taxonomy
            .parent(current)
            .filter(|&parent| parent != self.taxonomy.root);
        Some(current)
    }
}
