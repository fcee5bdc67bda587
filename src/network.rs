//! Discrimination network (long-term memory)
//!
//! A rooted tree per modality. Every node carries the test path that
//! leads to it (its contents) and an image: the chunk it has learned to
//! complete. Nodes live in one arena and refer to each other by
//! [`NodeId`], so there are no back-pointers.
//!
//! Children are kept most-recent first. Recognition tries them in that
//! order and descends into the first whose test matches.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Time;
use crate::error::{ChrestError, ChrestResult};
use crate::pattern::{Modality, Pattern, Primitive};

/// Handle to a node in the network arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A test leading from a parent to one child.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    test: Pattern,
    child: NodeId,
    created_at: Time,
}

impl Link {
    #[inline]
    pub fn test(&self) -> &Pattern {
        &self.test
    }

    #[inline]
    pub fn child(&self) -> NodeId {
        self.child
    }

    #[inline]
    pub fn created_at(&self) -> Time {
        self.created_at
    }
}

/// A node in the discrimination network.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    id: NodeId,
    modality: Modality,
    contents: Pattern,
    image: Pattern,
    children: Vec<Link>,
    action_links: BTreeMap<NodeId, f64>,
    created_at: Time,
}

impl Node {
    fn new(id: NodeId, modality: Modality, contents: Pattern, created_at: Time) -> Self {
        Self {
            id,
            modality,
            contents,
            image: Pattern::new(modality),
            children: Vec::new(),
            action_links: BTreeMap::new(),
            created_at,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Concatenated tests on the path from the root.
    #[inline]
    pub fn contents(&self) -> &Pattern {
        &self.contents
    }

    #[inline]
    pub fn image(&self) -> &Pattern {
        &self.image
    }

    /// Child links, most recently created first.
    #[inline]
    pub fn children(&self) -> &[Link] {
        &self.children
    }

    /// Action nodes associated with this node and their weights.
    #[inline]
    pub fn action_links(&self) -> &BTreeMap<NodeId, f64> {
        &self.action_links
    }

    pub fn action_weight(&self, action: NodeId) -> Option<f64> {
        self.action_links.get(&action).copied()
    }

    #[inline]
    pub fn created_at(&self) -> Time {
        self.created_at
    }

    pub(crate) fn image_mut(&mut self) -> &mut Pattern {
        &mut self.image
    }

    pub(crate) fn action_links_mut(&mut self) -> &mut BTreeMap<NodeId, f64> {
        &mut self.action_links
    }
}

/// Long-term memory: the node arena plus one root per modality.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ltm {
    nodes: Vec<Node>,
    roots: [NodeId; 3],
}

impl Ltm {
    /// Create a network holding only the modality roots.
    pub fn new(created_at: Time) -> Self {
        let nodes: Vec<Node> = Modality::ALL
            .iter()
            .enumerate()
            .map(|(i, &m)| Node::new(NodeId(i), m, Pattern::new(m), created_at))
            .collect();
        Self {
            nodes,
            roots: [NodeId(0), NodeId(1), NodeId(2)],
        }
    }

    /// Root node for a modality.
    #[inline]
    pub fn root(&self, modality: Modality) -> NodeId {
        self.roots[modality.index()]
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Like [`Ltm::node`] but an unknown id is an error.
    pub fn get(&self, id: NodeId) -> ChrestResult<&Node> {
        self.nodes.get(id.0).ok_or(ChrestError::UnknownNode(id.0))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> ChrestResult<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(ChrestError::UnknownNode(id.0))
    }

    /// Total number of nodes, roots included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == self.roots.len()
    }

    /// Learned nodes in one modality (root excluded).
    pub fn size(&self, modality: Modality) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.modality == modality && !self.is_root(n.id))
            .count()
    }

    /// Deepest node reached by following the first matching child at each
    /// level. Never fails; returns the modality root when nothing matches.
    pub fn recognise(&self, pattern: &Pattern) -> NodeId {
        let mut current = self.root(pattern.modality());
        let mut remaining = pattern.clone();

        'descend: loop {
            for link in &self.nodes[current.0].children {
                if link.test.matches(&remaining) {
                    remaining = remaining.remove(&link.test);
                    current = link.child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Has `item` been learned as a primitive under the modality root?
    pub fn knows_primitive(&self, modality: Modality, item: &Primitive) -> bool {
        let root = self.root(modality);
        self.nodes[root.0]
            .children
            .iter()
            .any(|link| link.test.len() == 1 && link.test.first() == Some(item))
    }

    /// Grow the network: add a child under `parent` reached by `test`.
    /// The child's contents extend the parent's; its image starts empty.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        test: Pattern,
        time: Time,
    ) -> ChrestResult<NodeId> {
        let parent_node = self.get(parent)?;
        let modality = parent_node.modality;
        let contents = parent_node.contents.concat(&test);

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, modality, contents, time));
        self.get_mut(parent)?.children.insert(
            0,
            Link {
                test,
                child: id,
                created_at: time,
            },
        );
        Ok(id)
    }
}
