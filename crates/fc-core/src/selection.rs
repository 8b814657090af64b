//! Selection set shared by the interaction layer and the renderer.

use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selected {
    Node(String),
    Edge(String),
}

/// Insertion-ordered set of selected nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: SmallVec<[Selected; 4]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an item. Without `additive` it replaces the selection.
    pub fn select(&mut self, item: Selected, additive: bool) {
        if !additive {
            self.items.clear();
        }
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop entries whose id fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Selected) -> bool) {
        self.items.retain(|item| keep(item));
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.items.iter().any(|s| matches!(s, Selected::Node(n) if n == id))
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.items.iter().any(|s| matches!(s, Selected::Edge(e) if e == id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|s| match s {
            Selected::Node(id) => Some(id.as_str()),
            Selected::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|s| match s {
            Selected::Edge(id) => Some(id.as_str()),
            Selected::Node(_) => None,
        })
    }

    pub fn items(&self) -> &[Selected] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
