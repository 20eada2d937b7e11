// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Port of Clipper 6.4.2 clipper.cpp/hpp (PolyTree, PolyNode)
//
// Containment tree of clipping results.
//
// Nodes live in one Vec and refer to each other by index. Top-level nodes are
// outer contours (or open paths); each level down alternates between holes
// and outers.

use crate::geom::{IntPoint, Path, Paths};

pub type NodeId = usize;

#[derive(Clone, Debug, Default)]
pub struct PolyNode {
    contour: Path,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position among its siblings.
    index: usize,
    is_open: bool,
}

impl PolyNode {
    pub fn contour(&self) -> &[IntPoint] {
        &self.contour
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

#[derive(Clone, Debug, Default)]
pub struct PolyTree {
    nodes: Vec<PolyNode>,
    roots: Vec<NodeId>,
}

impl PolyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Top-level nodes in result order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &PolyNode {
        &self.nodes[id]
    }

    /// Number of nodes at every depth.
    pub fn total(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Holes sit at odd depths.
    pub fn is_hole(&self, id: NodeId) -> bool {
        let mut hole = false;
        let mut p = self.nodes[id].parent;
        while let Some(i) = p {
            hole = !hole;
            p = self.nodes[i].parent;
        }
        hole
    }

    /// First node of a depth-first walk.
    pub fn first(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }

    /// Next node of a depth-first walk: the first child if there is one,
    /// otherwise the next sibling of the nearest ancestor that has one.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        if let Some(&c) = self.nodes[id].children.first() {
            return Some(c);
        }
        let mut cur = id;
        loop {
            let n = &self.nodes[cur];
            let siblings = match n.parent {
                Some(p) => &self.nodes[p].children,
                None => &self.roots,
            };
            if let Some(&s) = siblings.get(n.index + 1) {
                return Some(s);
            }
            cur = n.parent?;
        }
    }

    /// Every node in depth-first order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.first(), move |&id| self.next(id))
    }

    pub(crate) fn add_node(&mut self, contour: Path, is_open: bool) -> NodeId {
        self.nodes.push(PolyNode { contour, is_open, ..PolyNode::default() });
        self.nodes.len() - 1
    }

    /// Attaches `child` under `parent`, or at the top level.
    pub(crate) fn add_child(&mut self, parent: Option<NodeId>, child: NodeId) {
        let siblings = match parent {
            Some(p) => &mut self.nodes[p].children,
            None => &mut self.roots,
        };
        let index = siblings.len();
        siblings.push(child);
        let c = &mut self.nodes[child];
        c.parent = parent;
        c.index = index;
    }

    /// Replaces a tree with a single top-level node by that node's children,
    /// moved up one level. Any other shape leaves an empty tree.
    pub(crate) fn strip_outer(&mut self) {
        if self.roots.len() != 1 || self.nodes[self.roots[0]].children.is_empty() {
            self.clear();
            return;
        }
        let old = std::mem::take(self);
        for &c in &old.nodes[old.roots[0]].children {
            self.copy_subtree(&old, c, None);
        }
    }

    fn copy_subtree(&mut self, src: &PolyTree, id: NodeId, parent: Option<NodeId>) {
        let n = &src.nodes[id];
        let new_id = self.add_node(n.contour.clone(), n.is_open);
        self.add_child(parent, new_id);
        for &c in &n.children {
            self.copy_subtree(src, c, Some(new_id));
        }
    }
}

// ─────────────────────────── Flattening ───────────────────────────────────────

fn collect(tree: &PolyTree, id: NodeId, closed_only: bool, out: &mut Paths) {
    let n = tree.node(id);
    if closed_only && n.is_open {
        return;
    }
    if !n.contour.is_empty() {
        out.push(n.contour.clone());
    }
    for &c in &n.children {
        collect(tree, c, closed_only, out);
    }
}

/// Every contour in the tree, parents before children.
pub fn polytree_to_paths(tree: &PolyTree) -> Paths {
    let mut out = Vec::with_capacity(tree.total());
    for &r in tree.roots() {
        collect(tree, r, false, &mut out);
    }
    out
}

/// Closed contours only.
pub fn closed_paths_from_polytree(tree: &PolyTree) -> Paths {
    let mut out = Vec::with_capacity(tree.total());
    for &r in tree.roots() {
        collect(tree, r, true, &mut out);
    }
    out
}

/// Open paths only; these are always top-level.
pub fn open_paths_from_polytree(tree: &PolyTree) -> Paths {
    tree.roots()
        .iter()
        .map(|&r| tree.node(r))
        .filter(|n| n.is_open)
        .map(|n| n.contour.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::path_from;

    fn square(x: i64, y: i64, s: i64) -> Path {
        path_from(&[(x, y), (x + s, y), (x + s, y + s), (x, y + s)])
    }

    /// outer(0) > hole(1) > island(2); outer(3); open(4)
    fn sample() -> PolyTree {
        let mut t = PolyTree::new();
        let a = t.add_node(square(0, 0, 100), false);
        let b = t.add_node(square(10, 10, 80), false);
        let c = t.add_node(square(20, 20, 10), false);
        let d = t.add_node(square(200, 0, 10), false);
        let e = t.add_node(path_from(&[(0, -5), (50, -5)]), true);
        t.add_child(None, a);
        t.add_child(Some(a), b);
        t.add_child(Some(b), c);
        t.add_child(None, d);
        t.add_child(None, e);
        t
    }

    #[test]
    fn depth_parity_gives_hole_state() {
        let t = sample();
        assert!(!t.is_hole(0));
        assert!(t.is_hole(1));
        assert!(!t.is_hole(2));
        assert!(!t.is_hole(3));
        assert_eq!(t.total(), 5);
    }

    #[test]
    fn walk_is_depth_first() {
        let t = sample();
        let order: Vec<NodeId> = t.iter().collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert_eq!(t.next(4), None);
        assert_eq!(t.node(3).index(), 1);
    }

    #[test]
    fn flattening_filters_by_kind() {
        let t = sample();
        assert_eq!(polytree_to_paths(&t).len(), 5);
        assert_eq!(closed_paths_from_polytree(&t).len(), 4);
        let open = open_paths_from_polytree(&t);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].len(), 2);
    }

    #[test]
    fn strip_outer_promotes_children() {
        let mut t = PolyTree::new();
        let frame = t.add_node(square(-10, -10, 120), false);
        let a = t.add_node(square(0, 0, 10), false);
        let b = t.add_node(square(50, 50, 10), false);
        let hole = t.add_node(square(52, 52, 2), false);
        t.add_child(None, frame);
        t.add_child(Some(frame), a);
        t.add_child(Some(frame), b);
        t.add_child(Some(b), hole);
        t.strip_outer();
        assert_eq!(t.roots().len(), 2);
        assert_eq!(t.total(), 3);
        let b2 = t.roots()[1];
        assert_eq!(t.node(b2).contour(), &square(50, 50, 10)[..]);
        assert!(t.is_hole(t.node(b2).children()[0]));
    }

    #[test]
    fn strip_outer_without_children_empties() {
        let mut t = PolyTree::new();
        let frame = t.add_node(square(0, 0, 1), false);
        t.add_child(None, frame);
        t.strip_outer();
        assert!(t.is_empty());
        assert_eq!(t.first(), None);
    }
}
