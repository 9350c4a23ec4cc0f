//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Lvalue rewrite pass for cgen
//
// The front end types an lvalue node as the object it names; code
// generation wants the address instead. This pass runs bottom-up over
// every freshly loaded expression tree, advancing each lvalue's type
// by one level of indirection so the rest of the backend can treat it
// uniformly as a pointer. Function values decay to the generic
// pointer type at the same time.
//

use crate::backend::CodeGenerator;
use crate::diag::{warning, Result};
use crate::ir::{TypeCode, LVAL, REWRITTEN};
use crate::node::{NodeArena, NodeId};

/// Rewrite one tree in place, children before parents, and give the
/// target a final look at every node. The returned id replaces the
/// argument as the subtree root (the target hook may substitute a
/// different node).
pub fn rewrite_tree(
    pool: &mut NodeArena,
    gen: &mut dyn CodeGenerator,
    n: NodeId,
) -> Result<NodeId> {
    if let Some(l) = pool[n].left {
        let l = rewrite_tree(pool, gen, l)?;
        pool[n].left = Some(l);
    }
    if let Some(r) = pool[n].right {
        let r = rewrite_tree(pool, gen, r)?;
        pool[n].right = Some(r);
    }

    let node = &mut pool[n];
    if node.flags & LVAL != 0 && node.flags & REWRITTEN == 0 {
        node.typ = node.typ.ptr_to();
        node.flags |= REWRITTEN;
    }
    // a non-pointer in the aggregate range at this point is a front
    // end slip, but one the helpers can usually survive
    if !node.typ.is_ptr() && node.typ.in_aggregate_range() {
        warning(&format!(
            "bad node type {:#06x} for node of {:#06x}",
            node.typ.0,
            node.op.wire()
        ));
    }
    if node.typ.is_function() {
        node.typ = TypeCode::PTRTO;
    }

    gen.try_rewrite(pool, n)
}

// ============================================================================
// Tests
// ============================================================================
