//! Short-term memory - a bounded most-recently-used list of nodes

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::network::NodeId;
use crate::pattern::Modality;

/// Fixed-capacity MRU list of node references, most recent first.
///
/// Pushing a node already present moves it to the front. Pushing into a
/// full list evicts the oldest entry.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stm {
    modality: Modality,
    capacity: usize,
    items: VecDeque<NodeId>,
}

impl Stm {
    pub fn new(modality: Modality, capacity: usize) -> Self {
        Self {
            modality,
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn modality(&self) -> Modality {
        self.modality
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.items.contains(&node)
    }

    /// Most recently pushed node.
    pub fn most_recent(&self) -> Option<NodeId> {
        self.items.front().copied()
    }

    /// Entries, most recent first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.items.iter().copied()
    }

    /// Put `node` at the front. Returns the evicted node, if any.
    pub fn push(&mut self, node: NodeId) -> Option<NodeId> {
        if let Some(pos) = self.items.iter().position(|&n| n == node) {
            self.items.remove(pos);
            self.items.push_front(node);
            return None;
        }
        self.items.push_front(node);
        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
