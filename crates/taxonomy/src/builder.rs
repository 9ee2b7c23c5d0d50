use crate::error::{Result, TaxonomyError};
use crate::node::{DefaultFactory, NodeFactory, NodeId, PathSegment, TaxonomyNode};
use crate::tree::Taxonomy;
use petgraph::graph::DiGraph;
use std::collections::{BTreeMap, HashMap};

/// Build phase of a taxonomy.
///
/// Paths are added one observed item at a time; [`TaxonomyBuilder::finalize`]
/// consumes the builder and yields the read-only [`Taxonomy`]. Node ids handed
/// out while building stay valid in the finalized tree.
pub struct TaxonomyBuilder<P> {
    graph: DiGraph<TaxonomyNode<P>, ()>,
    root: NodeId,
    /// Sorted children per branch, keyed by sort key
    branches: HashMap<NodeId, BTreeMap<String, NodeId>>,
    factory: Box<dyn NodeFactory<P>>,
}

impl<P: Default + 'static> TaxonomyBuilder<P> {
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = TaxonomyNode::new(&PathSegment::anonymous(root_name), P::default());
        Self::from_root(root, Box::new(DefaultFactory))
    }
}

impl<P> TaxonomyBuilder<P> {
    /// Builder whose node payloads (root included) come from `factory`
    pub fn with_factory(
        root_name: impl Into<String>,
        factory: impl NodeFactory<P> + 'static,
    ) -> Result<Self> {
        let segment = PathSegment::anonymous(root_name);
        let payload = factory.create(&segment)?;
        Ok(Self::from_root(
            TaxonomyNode::new(&segment, payload),
            Box::new(factory),
        ))
    }

    fn from_root(mut root: TaxonomyNode<P>, factory: Box<dyn NodeFactory<P>>) -> Self {
        root.branch = true;
        let mut graph = DiGraph::new();
        let root = graph.add_node(root);
        Self {
            graph,
            root,
            branches: HashMap::new(),
            factory,
        }
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&TaxonomyNode<P>> {
        self.graph.node_weight(id)
    }

    /// Payload of a node, for recording aggregates while building
    pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut P> {
        self.graph.node_weight_mut(id).map(|node| &mut node.payload)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() <= 1
    }

    /// Classify one item along `path`, counting it on every node it passes.
    ///
    /// `attachment` is appended to the leaf's tooltip.
    pub fn add(&mut self, path: &[PathSegment], attachment: Option<&str>) -> Result<NodeId> {
        let trail = self.materialize(path)?;
        if let Some(root) = self.graph.node_weight_mut(self.root) {
            root.count += 1;
        }
        for &id in &trail {
            if let Some(node) = self.graph.node_weight_mut(id) {
                node.count += 1;
            }
        }

        let leaf = trail[trail.len() - 1];
        if let Some(text) = attachment {
            if let Some(node) = self.graph.node_weight_mut(leaf) {
                node.append_tooltip(text);
            }
        }
        Ok(leaf)
    }

    /// Make sure `path` exists without counting anything on it.
    ///
    /// The final node is registered as a branch, so it shows as one even
    /// before any item is classified beneath it.
    pub fn add_without_incrementing(&mut self, path: &[PathSegment]) -> Result<NodeId> {
        let trail = self.materialize(path)?;
        let last = trail[trail.len() - 1];
        if let Some(node) = self.graph.node_weight_mut(last) {
            node.branch = true;
        }
        Ok(last)
    }

    /// Resolve or create every node of `path`, returning their ids root-side first.
    ///
    /// Payloads for all missing nodes are built before any of them is linked,
    /// so a factory failure leaves the tree as it was.
    fn materialize(&mut self, path: &[PathSegment]) -> Result<Vec<NodeId>> {
        if path.is_empty() {
            return Err(TaxonomyError::EmptyPath);
        }

        let mut trail = Vec::with_capacity(path.len());
        let mut current = self.root;
        for segment in path {
            match self.child(current, segment.key()) {
                Some(child) => {
                    trail.push(child);
                    current = child;
                }
                None => break,
            }
        }

        let missing = &path[trail.len()..];
        let payloads = missing
            .iter()
            .map(|segment| self.factory.create(segment))
            .collect::<Result<Vec<_>>>()?;

        for (segment, payload) in missing.iter().zip(payloads) {
            self.graph[current].branch = true;
            let child = self.graph.add_node(TaxonomyNode::new(segment, payload));
            self.graph.add_edge(current, child, ());
            self.branches
                .entry(current)
                .or_default()
                .insert(segment.key().to_string(), child);
            trail.push(child);
            current = child;
        }

        Ok(trail)
    }

    fn child(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        self.branches.get(&parent)?.get(key).copied()
    }

    /// Freeze the tree: child lists are laid out in sort-key order and the
    /// root starts expanded.
    pub fn finalize(mut self) -> Taxonomy<P> {
        for (parent, children) in self.branches {
            if let Some(node) = self.graph.node_weight_mut(parent) {
                node.children = children.into_values().collect();
            }
        }
        if let Some(root) = self.graph.node_weight_mut(self.root) {
            root.expanded = true;
        }

        log::debug!(
            "Finalized taxonomy: {} nodes, {} classified items",
            self.graph.node_count(),
            self.graph[self.root].count
        );

        Taxonomy::from_parts(self.graph, self.root)
    }
}
