use crate::error::Result;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Handle of a node inside its taxonomy's arena
pub type NodeId = NodeIndex;

/// One step of a classification path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Stable id, unique among siblings
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Numeric/byte code shown next to the name
    pub code: Option<String>,

    /// Sibling ordering key, defaults to the id
    pub sort_key: Option<String>,
}

impl PathSegment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            code: None,
            sort_key: None,
        }
    }

    /// Segment without an id; it can never be selected by id
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            code: None,
            sort_key: None,
        }
    }

    /// Builder: set code
    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Builder: set sort key
    #[must_use]
    pub fn sort_key(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }

    /// Key under which this segment is stored among its siblings
    #[must_use]
    pub fn key(&self) -> &str {
        self.sort_key
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or(&self.name)
    }
}

/// Node of the classification tree
#[derive(Debug, Clone)]
pub struct TaxonomyNode<P> {
    id: Option<String>,
    sort_key: String,
    name: String,
    code: Option<String>,
    pub(crate) count: u64,
    pub(crate) tooltip: String,
    pub(crate) expanded: bool,
    pub(crate) branch: bool,
    pub(crate) children: Vec<NodeId>,
    pub(crate) payload: P,
}

impl<P> TaxonomyNode<P> {
    pub(crate) fn new(segment: &PathSegment, payload: P) -> Self {
        Self {
            id: segment.id.clone(),
            sort_key: segment.key().to_string(),
            name: segment.name.clone(),
            code: segment.code.clone(),
            count: 0,
            tooltip: String::new(),
            expanded: false,
            branch: false,
            children: Vec::new(),
            payload,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Number of counting adds that passed through this node
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Accumulated attachment text, one attachment per line
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Child ids in sort-key order (empty until finalized)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node was created to hold children, even if none arrived
    pub const fn is_branch(&self) -> bool {
        self.branch
    }

    pub const fn is_leaf(&self) -> bool {
        !self.branch
    }

    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// `Name [code] (count)`
    pub fn label(&self) -> String {
        match &self.code {
            Some(code) => format!("{} [{}] ({})", self.name, code, self.count),
            None => format!("{} ({})", self.name, self.count),
        }
    }

    pub(crate) fn append_tooltip(&mut self, text: &str) {
        if !self.tooltip.is_empty() {
            self.tooltip.push('\n');
        }
        self.tooltip.push_str(text);
    }
}

/// Builds the payload of every node created in a taxonomy
pub trait NodeFactory<P> {
    /// Create the payload for a new node; failing leaves the tree untouched
    fn create(&self, segment: &PathSegment) -> Result<P>;
}

/// Factory producing `P::default()` for every node
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl<P: Default> NodeFactory<P> for DefaultFactory {
    fn create(&self, _segment: &PathSegment) -> Result<P> {
        Ok(P::default())
    }
}

/// Factory backed by a closure
pub struct FnFactory<F>(pub F);

impl<P, F> NodeFactory<P> for FnFactory<F>
where
    F: Fn(&PathSegment) -> Result<P>,
{
    fn create(&self, segment: &PathSegment) -> Result<P> {
        (self.0)(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_falls_back_to_id_then_name() {
        assert_eq!(PathSegment::new("noteOn", "Note On").key(), "noteOn");
        assert_eq!(PathSegment::new("noteOn", "Note On").sort_key("90").key(), "90");
        assert_eq!(PathSegment::anonymous("Misc").key(), "Misc");
    }

    #[test]
    fn tooltip_accumulates_lines() {
        let mut node = TaxonomyNode::new(&PathSegment::new("a", "A"), ());
        node.append_tooltip("first");
        node.append_tooltip("second");
        assert_eq!(node.tooltip(), "first\nsecond");
    }

    #[test]
    fn label_includes_code_when_present() {
        let node = TaxonomyNode::new(&PathSegment::new("noteOn", "Note On").code("9n"), ());
        assert_eq!(node.label(), "Note On [9n] (0)");
    }
}
