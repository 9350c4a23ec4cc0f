//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Expression tree nodes for cgen
//
// Nodes live in a fixed-capacity arena and are addressed by index, so
// a tree is a root NodeId plus optional child ids. Nodes are created
// only by the tree loader, mutated in place by the rewrite pass and
// the code generator driver, and must be released back to the arena
// exactly once before the next expression can reuse their slots.
//

use crate::diag::{Error, Result};
use crate::ir::{NodeRecord, Op, TypeCode, WIRE_FLAGS};
use std::io::Read;
use std::ops::{Index, IndexMut};

/// Arena capacity; allocation past this is fatal
pub const NUM_NODES: usize = 200;

/// Recursion guard for tree load/release. Depth is bounded by source
/// expression nesting, not hostile input, but a front-end bug should
/// surface as a reported error rather than stack exhaustion.
pub const MAX_TREE_DEPTH: usize = 128;

// ============================================================================
// Node
// ============================================================================

/// Stable handle into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u16);

/// One expression tree cell.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub op: Op,
    pub typ: TypeCode,
    pub flags: u16,
    pub value: u32,
    pub val2: u32,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            op: Op::Null,
            typ: TypeCode::CCHAR,
            flags: 0,
            value: 0,
            val2: 0,
            left: None,
            right: None,
        }
    }
}

// ============================================================================
// Node Arena
// ============================================================================

/// Fixed-capacity node pool with a free-index stack.
pub struct NodeArena {
    slots: Vec<Node>,
    free: Vec<u16>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena {
            slots: vec![Node::default(); NUM_NODES],
            // Popped back to front, but allocation order is not part
            // of the contract
            free: (0..NUM_NODES as u16).rev().collect(),
        }
    }

    /// Take a cleared node from the pool; exhaustion is fatal.
    pub fn allocate(&mut self) -> Result<NodeId> {
        let idx = self.free.pop().ok_or(Error::NodeLimit)?;
        self.slots[idx as usize] = Node::default();
        Ok(NodeId(idx))
    }

    /// Return one node to the pool; does not recurse into children.
    pub fn release(&mut self, n: NodeId) {
        debug_assert!(!self.free.contains(&n.0), "node released twice");
        self.free.push(n.0);
    }

    /// Release a whole tree, children first.
    pub fn release_tree(&mut self, n: NodeId) {
        if let Some(l) = self[n].left {
            self.release_tree(l);
        }
        if let Some(r) = self[n].right {
            self.release_tree(r);
        }
        self.release(n);
    }

    /// Number of free slots; the arena invariant says this returns to
    /// its pre-load value after every release_tree
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, n: NodeId) -> &Node {
        &self.slots[n.0 as usize]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, n: NodeId) -> &mut Node {
        &mut self.slots[n.0 as usize]
    }
}

// ============================================================================
// Tree Loader
// ============================================================================

/// Deserialize one pre-order encoded tree from the stream.
///
/// The child words in each record are consumed purely as
/// present/absent flags: a non-zero left slot means a left subtree
/// record follows immediately, then the right subtree symmetrically.
pub fn load_tree(input: &mut impl Read, pool: &mut NodeArena) -> Result<NodeId> {
    load_tree_at(input, pool, 0)
}

fn load_tree_at(input: &mut impl Read, pool: &mut NodeArena, depth: usize) -> Result<NodeId> {
    if depth >= MAX_TREE_DEPTH {
        return Err(Error::TreeTooDeep);
    }
    let rec = NodeRecord::read(input)?;
    let op = Op::from_wire(rec.op).ok_or(Error::InvalidOp(rec.op))?;
    let id = pool.allocate()?;
    {
        let n = &mut pool[id];
        n.op = op;
        n.typ = TypeCode(rec.typ);
        n.flags = rec.flags & WIRE_FLAGS;
        n.value = rec.value;
        n.val2 = rec.val2;
    }
    if rec.left != 0 {
        let l = load_tree_at(input, pool, depth + 1)?;
        pool[id].left = Some(l);
    }
    if rec.right != 0 {
        let r = load_tree_at(input, pool, depth + 1)?;
        pool[id].right = Some(r);
    }
    Ok(id)
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Build a node directly in the arena (tests only; real nodes come
/// from the loader).
#[cfg(test)]
pub fn tnode(
    pool: &mut NodeArena,
    op: Op,
    typ: TypeCode,
    left: Option<NodeId>,
    right: Option<NodeId>,
) -> NodeId {
    let id = pool.allocate().expect("arena full in test");
    let n = &mut pool[id];
    n.op = op;
    n.typ = typ;
    n.left = left;
    n.right = right;
    id
}

// ============================================================================
// Tests
// ============================================================================
