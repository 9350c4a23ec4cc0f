//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Target code generator interface for cgen
//
// The architecture-independent core emits output exclusively through
// this trait. A target implements the unconditional hooks to produce
// its assembly dialect, and may accept any of the try_* node hooks to
// shortcut the generic tree walk; declining them routes the node
// through the helper-call fallback.
//

use crate::diag::Result;
use crate::ir::TypeCode;
use crate::node::{Node, NodeArena, NodeId};
use crate::segment::Segment;
use std::io::Write;

// ============================================================================
// CodeGenerator
// ============================================================================

/// The callback interface between the backend core and one target.
pub trait CodeGenerator {
    /// Output stream; helper dispatch writes the helper-call name text
    /// here, between the pre_call and post_call hooks.
    fn output(&mut self) -> &mut dyn Write;

    // ---- lifecycle ----
    fn start(&mut self) -> Result<()>;
    fn end(&mut self) -> Result<()>;

    // ---- areas ----
    fn segment(&mut self, seg: Segment) -> Result<()>;

    // ---- functions ----
    fn prologue(&mut self, name: &str) -> Result<()>;
    fn frame(&mut self, size: u16) -> Result<()>;
    fn epilogue(&mut self, frame: u16) -> Result<()>;

    // ---- labels and branches ----
    fn label(&mut self, prefix: &str, id: u32) -> Result<()>;
    fn jump(&mut self, prefix: &str, id: u32) -> Result<()>;
    fn jump_if_true(&mut self, prefix: &str, id: u32) -> Result<()>;
    fn jump_if_false(&mut self, prefix: &str, id: u32) -> Result<()>;

    // ---- data ----
    fn export(&mut self, name: &str) -> Result<()>;
    fn data_label(&mut self, name: &str, size: u16) -> Result<()>;
    /// Reference to a string literal by id
    fn text_data(&mut self, id: u32) -> Result<()>;
    fn space(&mut self, size: u32) -> Result<()>;
    fn value(&mut self, typ: TypeCode, value: u32) -> Result<()>;
    fn name_ref(&mut self, name: &str, node: &Node) -> Result<()>;

    // ---- switch ----
    fn switch_header(&mut self, id: u16, typ: TypeCode) -> Result<()>;
    /// Case-comparison label definition (default uses value 0)
    fn case_label(&mut self, id: u16, value: u16) -> Result<()>;
    /// Switch-table entry referencing a case label
    fn case_data(&mut self, id: u32, value: u32) -> Result<()>;
    fn switch_table(&mut self, id: u16, size: u16) -> Result<()>;

    // ---- literals ----
    fn literal(&mut self, id: u16) -> Result<()>;

    // ---- node hooks; Ok(false) means "core takes over" ----

    /// Offered the whole subtree before the generic walk descends.
    fn try_shortcut(&mut self, _pool: &mut NodeArena, _n: NodeId) -> Result<bool> {
        Ok(false)
    }

    /// Offered every node the core is about to emit generically.
    fn try_node(&mut self, _pool: &mut NodeArena, _n: NodeId) -> Result<bool> {
        Ok(false)
    }

    /// Offered a binary node after its left side was evaluated.
    fn try_direct(&mut self, _pool: &mut NodeArena, _n: NodeId) -> Result<bool> {
        Ok(false)
    }

    /// Offered a right-only node before its operand is evaluated.
    fn try_unary_direct(&mut self, _pool: &mut NodeArena, _n: NodeId) -> Result<bool> {
        Ok(false)
    }

    /// Offered the chance to stack an evaluated left operand natively.
    fn try_push(&mut self, _pool: &mut NodeArena, _n: NodeId) -> Result<bool> {
        Ok(false)
    }

    /// Target-specific peephole over freshly rewritten nodes; may
    /// return a different node to replace the argument.
    fn try_rewrite(&mut self, _pool: &mut NodeArena, n: NodeId) -> Result<NodeId> {
        Ok(n)
    }

    // ---- helper calls ----
    fn pre_call(&mut self, _pool: &NodeArena, _n: NodeId) -> Result<()> {
        Ok(())
    }
    fn post_call(&mut self, _pool: &NodeArena, _n: NodeId) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Recording target (tests)
// ============================================================================
