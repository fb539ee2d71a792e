//! Execution trees: the forest shape decoded from one framed trace block.
//!
//! Nodes live in a flat arena indexed by `NodeId` rather than as an owned
//! tree of boxed children. This lets both construction (`core::decoder`)
//! and the two passes over the tree below (constraint propagation, path
//! walking) use an explicit work stack of indices instead of recursion,
//! which is required because input depth is untrusted (§4.2/§4.5/§9).

use crate::model::Event;

use super::constraint::ConstraintMgr;

pub type NodeId = usize;

/// One node of an execution tree, owned by its tree's arena.
pub struct ExecNode {
    pub event: Event,
    pub children: Vec<NodeId>,
    pub constraints: ConstraintMgr,
}

impl ExecNode {
    pub fn new(event: Event) -> Self {
        Self { event, children: Vec::new(), constraints: ConstraintMgr::default() }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A decoded forest member. Invariant: every non-leaf has at least one
/// child, and every leaf's event is `EventKind::EndOfPath`.
pub struct ExecTree {
    pub nodes: Vec<ExecNode>,
    pub root: NodeId,
}

impl ExecTree {
    pub fn new(nodes: Vec<ExecNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    /// Derives each node's `ConstraintMgr` from its parent with an explicit
    /// stack, per the first-binding-wins rule (§4.4). Must run once, right
    /// after the tree is fully built; the root starts from a fresh,
    /// unconstrained manager.
    pub fn propagate_constraints(&mut self) {
        let mut stack: Vec<(NodeId, ConstraintMgr)> = vec![(self.root, ConstraintMgr::default())];

        while let Some((id, inherited)) = stack.pop() {
            let next = {
                let node = &mut self.nodes[id];
                node.constraints = inherited;
                node.constraints.advance(&node.event)
            };
            let children = self.nodes[id].children.clone();
            for child in children {
                stack.push((child, next.clone()));
            }
        }
    }

    /// Enumerates every root-to-leaf path in DFS order, invoking `on_path`
    /// once per `EndOfPath` leaf with the ordered node-id sequence from
    /// root to that leaf (§4.5). Iterative: the work stack tracks
    /// `(node, next_child_index)` pairs rather than recursing.
    pub fn walk_paths(&self, mut on_path: impl FnMut(&[NodeId])) {
        let mut stack: Vec<(NodeId, usize)> = vec![(self.root, 0)];
        let mut path: Vec<NodeId> = Vec::new();

        while let Some(&(id, child_idx)) = stack.last() {
            if child_idx == 0 {
                path.push(id);
            }
            let node = &self.nodes[id];
            if child_idx < node.children.len() {
                stack.last_mut().unwrap().1 += 1;
                stack.push((node.children[child_idx], 0));
                continue;
            }
            stack.pop();
            if node.is_leaf() {
                on_path(&path);
            }
            path.pop();
        }
    }
}
