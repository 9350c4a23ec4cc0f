//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Expression code generation for cgen
//
// The model is a one-value working stack: evaluate the left subtree,
// push the result, evaluate the right subtree, then apply the node's
// operator to the pushed value and the working value. A target can
// accept any node through its try_* hooks; whatever it declines falls
// back to a call into the run-time helper library, suffixed by the
// operand type. Short-circuit and conditional operators never reach
// the operator dispatch at all: they lower to branches here.
//

use crate::backend::CodeGenerator;
use crate::diag::{warning, Error, Result};
use crate::ir::{Branching, Op, TypeCode, ISBOOL};
use crate::names::NameTable;
use crate::node::{NodeArena, NodeId};

// ============================================================================
// Label Allocation
// ============================================================================

/// Source of compiler-internal branch labels, distinct from the
/// front-end-assigned ids carried in header records.
pub struct LabelAlloc {
    next: u32,
}

impl LabelAlloc {
    pub fn new() -> Self {
        LabelAlloc { next: 0 }
    }

    pub fn fresh(&mut self) -> u32 {
        let n = self.next;
        self.next += 1;
        n
    }
}

impl Default for LabelAlloc {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tree Walk
// ============================================================================

/// Generate code for one expression tree, left to right.
pub fn walk(
    pool: &mut NodeArena,
    names: &NameTable,
    gen: &mut dyn CodeGenerator,
    labels: &mut LabelAlloc,
    n: NodeId,
) -> Result<()> {
    // branching operators control which subtrees run at all, so they
    // are lowered before the generic evaluate-push-evaluate shape
    if let Some(kind) = pool[n].op.branching() {
        match kind {
            Branching::Question => {
                // the condition, then the colon pair; the node itself
                // emits nothing
                if let Some(l) = pool[n].left {
                    walk(pool, names, gen, labels, l)?;
                }
                if let Some(r) = pool[n].right {
                    walk(pool, names, gen, labels, r)?;
                }
                return Ok(());
            }
            Branching::Colon => {
                let lab = labels.fresh();
                gen.jump_if_false("L", lab)?;
                if let Some(l) = pool[n].left {
                    walk(pool, names, gen, labels, l)?;
                }
                gen.jump("LC", lab)?;
                gen.label("L", lab)?;
                if let Some(r) = pool[n].right {
                    walk(pool, names, gen, labels, r)?;
                }
                gen.label("LC", lab)?;
                return make_node(pool, names, gen, n);
            }
            Branching::Or | Branching::And => {
                let lab = labels.fresh();
                if let Some(l) = pool[n].left {
                    walk(pool, names, gen, labels, l)?;
                }
                match kind {
                    Branching::Or => gen.jump_if_true("L", lab)?,
                    _ => gen.jump_if_false("L", lab)?,
                }
                if let Some(r) = pool[n].right {
                    walk(pool, names, gen, labels, r)?;
                }
                gen.label("L", lab)?;
                return Ok(());
            }
        }
    }

    if gen.try_shortcut(pool, n)? {
        return Ok(());
    }

    if let Some(l) = pool[n].left {
        walk(pool, names, gen, labels, l)?;
        // with the left value live, the target may finish the whole
        // node directly, or at least stack the value natively
        if gen.try_direct(pool, n)? {
            return Ok(());
        }
        if !gen.try_push(pool, l)? {
            helper(pool, gen, l, "push")?;
        }
    } else if gen.try_unary_direct(pool, n)? {
        return Ok(());
    }

    if let Some(r) = pool[n].right {
        walk(pool, names, gen, labels, r)?;
    }
    make_node(pool, names, gen, n)
}

// ============================================================================
// Operator Dispatch
// ============================================================================

/// Emit one operator, operands already in place. The target sees the
/// node first; declined nodes go to the helper library.
fn make_node(
    pool: &mut NodeArena,
    names: &NameTable,
    gen: &mut dyn CodeGenerator,
    n: NodeId,
) -> Result<()> {
    if gen.try_node(pool, n)? {
        return Ok(());
    }
    let node = pool[n];
    match node.op {
        Op::Null | Op::ArgComma => Ok(()),
        // lowered by the walk before dispatch
        Op::OrOr | Op::AndAnd | Op::Question | Op::Colon => Ok(()),

        Op::Plus => helper(pool, gen, n, "plus"),
        Op::Minus => helper(pool, gen, n, "minus"),
        Op::Star => helper(pool, gen, n, "mul"),
        Op::Slash => helper(pool, gen, n, "div"),
        Op::Percent => helper(pool, gen, n, "mod"),
        Op::And => helper(pool, gen, n, "band"),
        Op::Or => helper(pool, gen, n, "or"),
        Op::Hat => helper(pool, gen, n, "xor"),
        Op::Shl => helper(pool, gen, n, "shl"),
        Op::Shr => helper(pool, gen, n, "shr"),

        Op::PlusEq => helper(pool, gen, n, "pluseq"),
        Op::MinusEq => helper(pool, gen, n, "minuseq"),
        Op::StarEq => helper(pool, gen, n, "muleq"),
        Op::SlashEq => helper(pool, gen, n, "diveq"),
        Op::PercentEq => helper(pool, gen, n, "modeq"),
        Op::AndEq => helper(pool, gen, n, "andeq"),
        Op::OrEq => helper(pool, gen, n, "oreq"),
        Op::HatEq => helper(pool, gen, n, "xoreq"),
        Op::ShlEq => helper(pool, gen, n, "shleq"),
        Op::ShrEq => helper(pool, gen, n, "shreq"),
        Op::PostInc => helper(pool, gen, n, "postinc"),
        Op::PostDec => helper(pool, gen, n, "postdec"),

        // the comparison helpers leave a clean 0/1 in the working
        // value, which a later bool node can then skip
        Op::EqEq => helper_bool(pool, gen, n, "cceq"),
        Op::Lt => helper_bool(pool, gen, n, "cclt"),
        Op::Gt => helper_bool(pool, gen, n, "ccgt"),
        Op::LtEq => helper_bool(pool, gen, n, "cclteq"),
        Op::GtEq => helper_bool(pool, gen, n, "ccgteq"),
        Op::Bang => helper_bool(pool, gen, n, "not"),
        Op::BangEq => helper(pool, gen, n, "noteq"),

        Op::Tilde => helper(pool, gen, n, "cpl"),
        Op::Negate => helper(pool, gen, n, "negate"),
        Op::Assign => helper(pool, gen, n, "assign"),
        Op::Deref => helper(pool, gen, n, "deref"),
        Op::FuncCall => helper(pool, gen, n, "callfunc"),
        Op::Cast => helper(pool, gen, n, "cast"),
        Op::Comma => helper(pool, gen, n, "pop"),

        Op::Bool => {
            if let Some(r) = node.right {
                if pool[r].flags & ISBOOL != 0 {
                    return Ok(());
                }
            }
            helper_bool(pool, gen, n, "bool")
        }

        Op::Constant => {
            helper(pool, gen, n, "const")?;
            gen.value(node.typ, node.value)
        }
        Op::Label => {
            helper(pool, gen, n, "const")?;
            gen.text_data(node.value)
        }
        Op::Name => {
            helper(pool, gen, n, "loadn")?;
            gen.name_ref(names.resolve(node.val2 as u16)?, &node)
        }
        Op::Local => {
            helper(pool, gen, n, "loadl")?;
            gen.value(TypeCode::PTRTO, node.value)
        }
        Op::Argument => {
            helper(pool, gen, n, "loada")?;
            gen.value(TypeCode::PTRTO, node.value)
        }

        Op::Cleanup => Err(Error::StrayCleanup),
        // data-block-only nodes have no expression meaning
        Op::Pad | Op::CaseLabel => Err(Error::InvalidOp(node.op.wire())),
    }
}

/// Emit a comparison helper and mark the node as producing a boolean.
fn helper_bool(
    pool: &mut NodeArena,
    gen: &mut dyn CodeGenerator,
    n: NodeId,
    name: &str,
) -> Result<()> {
    helper(pool, gen, n, name)?;
    pool[n].flags |= ISBOOL;
    Ok(())
}

// ============================================================================
// Helper Calls
// ============================================================================

/// Emit one call into the run-time helper library. The call name is
/// the operation suffixed by the node's type class; a cast carries its
/// source type as a second suffix. Function call results are always
/// pointer-width.
fn helper(pool: &mut NodeArena, gen: &mut dyn CodeGenerator, n: NodeId, name: &str) -> Result<()> {
    if pool[n].op == Op::FuncCall {
        pool[n].typ = TypeCode::PTRTO;
    }
    let node = pool[n];

    let mut text = String::from(name);
    if node.op == Op::Cast {
        if let Some(r) = node.right {
            text.push_str(helper_suffix(pool[r].typ));
        }
        text.push('_');
    }
    text.push_str(helper_suffix(node.typ));
    text.push('\n');

    gen.pre_call(pool, n)?;
    gen.output().write_all(text.as_bytes())?;
    gen.post_call(pool, n)
}

/// Type-class suffix for helper names. Pointers take the native word
/// suffix regardless of what they point at.
pub fn helper_suffix(t: TypeCode) -> &'static str {
    if t.is_ptr() {
        return "";
    }
    match t.base() {
        TypeCode::CCHAR => "c",
        TypeCode::UCHAR => "uc",
        TypeCode::CSHORT => "",
        TypeCode::UINT => "u",
        TypeCode::CLONG => "l",
        TypeCode::ULONG => "ul",
        TypeCode::FLOAT => "f",
        TypeCode::DOUBLE => "d",
        _ => {
            warning(&format!("bad type {:#06x}", t.0));
            ""
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
