use slotmap::SlotMap;

use super::Path;

slotmap::new_key_type! {
    /// Unique identifier for a node in a [`ContourTree`].
    pub struct ContourId;
}

/// One contour of a hierarchical clipping result.
#[derive(Debug, Clone)]
pub struct ContourNode {
    /// Vertices of the contour.
    pub contour: Path,
    /// Enclosing contour, `None` for top-level contours.
    pub parent: Option<ContourId>,
    /// Contours directly nested inside this one.
    pub children: Vec<ContourId>,
    /// Open paths are always top-level and have no children.
    pub is_open: bool,
}

/// Nesting hierarchy of result contours.
///
/// Top-level closed contours are outers, their children are holes, the holes'
/// children are outers again, and so on. Open paths sit at the top level.
#[derive(Debug, Clone, Default)]
pub struct ContourTree {
    nodes: SlotMap<ContourId, ContourNode>,
    roots: Vec<ContourId>,
}

impl ContourTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contour under `parent` (or at the top level) and returns its ID.
    ///
    /// A `parent` that is not part of this tree places the contour at the top
    /// level.
    pub fn add(&mut self, contour: Path, parent: Option<ContourId>) -> ContourId {
        let is_open = !contour.closed;
        let parent = parent.filter(|p| self.nodes.contains_key(*p));
        let id = self.nodes.insert(ContourNode {
            contour,
            parent,
            children: Vec::new(),
            is_open,
        });
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Stores a contour without linking it anywhere yet; see [`Self::attach`].
    pub(crate) fn insert_detached(&mut self, contour: Path) -> ContourId {
        let is_open = !contour.closed;
        self.nodes.insert(ContourNode {
            contour,
            parent: None,
            children: Vec::new(),
            is_open,
        })
    }

    /// Links a detached node under `parent`, or at the top level.
    pub(crate) fn attach(&mut self, id: ContourId, parent: Option<ContourId>) {
        let parent = parent.filter(|&p| p != id && self.nodes.contains_key(p));
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent;
        }
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
    }

    /// Top-level contours in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[ContourId] {
        &self.roots
    }

    /// Returns the node for `id`, if it is part of this tree.
    #[must_use]
    pub fn node(&self, id: ContourId) -> Option<&ContourNode> {
        self.nodes.get(id)
    }

    /// Total number of contours in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the tree holds no contours.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of closed ancestors of `id`.
    #[must_use]
    pub fn depth(&self, id: ContourId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            depth += 1;
            current = self.nodes.get(p).and_then(|n| n.parent);
        }
        depth
    }

    /// `true` for closed contours at odd depth.
    #[must_use]
    pub fn is_hole(&self, id: ContourId) -> bool {
        match self.nodes.get(id) {
            Some(node) if !node.is_open => self.depth(id) % 2 == 1,
            _ => false,
        }
    }

    /// Removes a top-level contour and promotes its children to the top level.
    ///
    /// Returns the removed contour, or `None` when `id` is not a root.
    pub fn remove_root(&mut self, id: ContourId) -> Option<Path> {
        let pos = self.roots.iter().position(|&r| r == id)?;
        let node = self.nodes.remove(id)?;
        let mut promoted = Vec::with_capacity(node.children.len());
        for child in node.children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = None;
                promoted.push(child);
            }
        }
        self.roots.splice(pos..=pos, promoted);
        Some(node.contour)
    }

    /// All contours, parents before children.
    #[must_use]
    pub fn to_paths(&self) -> Vec<Path> {
        self.collect(|_| true)
    }

    /// Closed contours only, parents before children.
    #[must_use]
    pub fn closed_paths(&self) -> Vec<Path> {
        self.collect(|n| !n.is_open)
    }

    /// Open paths only.
    #[must_use]
    pub fn open_paths(&self) -> Vec<Path> {
        self.roots
            .iter()
            .filter_map(|&r| self.nodes.get(r))
            .filter(|n| n.is_open)
            .map(|n| n.contour.clone())
            .collect()
    }

    fn collect(&self, keep: impl Fn(&ContourNode) -> bool) -> Vec<Path> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ContourId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if keep(node) {
                out.push(node.contour.clone());
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(size: f64) -> Path {
        Path::polygon(&[(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)])
    }

    #[test]
    fn depth_determines_hole_state() {
        let mut tree = ContourTree::new();
        let outer = tree.add(square(10.0), None);
        let hole = tree.add(square(5.0).reversed(), Some(outer));
        let island = tree.add(square(2.0), Some(hole));
        assert!(!tree.is_hole(outer));
        assert!(tree.is_hole(hole));
        assert!(!tree.is_hole(island));
        assert_eq!(tree.depth(island), 2);
        assert_eq!(tree.node(outer).unwrap().children, vec![hole]);
    }

    #[test]
    fn open_paths_are_separated() {
        let mut tree = ContourTree::new();
        tree.add(square(1.0), None);
        tree.add(Path::polyline(&[(0.0, 0.0), (3.0, 3.0)]), None);
        assert_eq!(tree.closed_paths().len(), 1);
        assert_eq!(tree.open_paths().len(), 1);
        assert_eq!(tree.to_paths().len(), 2);
    }

    #[test]
    fn removing_root_promotes_children() {
        let mut tree = ContourTree::new();
        let outer = tree.add(square(10.0), None);
        let a = tree.add(square(2.0), Some(outer));
        let b = tree.add(square(3.0), Some(outer));
        let removed = tree.remove_root(outer).unwrap();
        assert_eq!(removed.len(), 4);
        assert_eq!(tree.roots(), &[a, b]);
        assert!(!tree.is_hole(a));
        assert!(tree.node(b).unwrap().parent.is_none());
        assert!(tree.remove_root(outer).is_none());
    }

    #[test]
    fn paths_are_listed_parents_first() {
        let mut tree = ContourTree::new();
        let outer = tree.add(square(10.0), None);
        tree.add(square(5.0), Some(outer));
        let paths = tree.closed_paths();
        assert_eq!(paths[0], square(10.0));
        assert_eq!(paths[1], square(5.0));
    }
}
