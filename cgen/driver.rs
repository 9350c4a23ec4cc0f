//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Block dispatch driver for cgen
//
// Consumes the IR stream block by block and turns structural header
// events into labels, jumps, and segment changes while handing the
// expression and data trees to the tree passes. All per-compilation
// state lives here: the node pool, the segment stack, the label
// allocator, and the current function's return bookkeeping.
//

use crate::backend::CodeGenerator;
use crate::codegen::{walk, LabelAlloc};
use crate::diag::{Error, Result};
use crate::ir::{
    Header, HeaderEvent, Op, Phase, TypeCode, BLOCK_DATA, BLOCK_EXPR, BLOCK_HEADER, SYNC,
};
use crate::names::NameTable;
use crate::node::{load_tree, NodeArena};
use crate::rewrite::rewrite_tree;
use crate::segment::{SegStack, Segment};
use std::io::Read;

// ============================================================================
// Backend Driver
// ============================================================================

/// One compilation: an IR stream in, assembly text out through the
/// target.
pub struct Backend<R: Read, G: CodeGenerator> {
    input: R,
    target: G,
    names: NameTable,
    pool: NodeArena,
    segs: SegStack,
    labels: LabelAlloc,
    /// Label id for the current function's return point
    func_ret: u16,
    /// Frame size reported by the most recent frame header
    frame_len: u16,
    /// Whether any return statement referenced the return label
    func_ret_used: bool,
}

impl<R: Read, G: CodeGenerator> Backend<R, G> {
    pub fn new(input: R, names: NameTable, target: G) -> Self {
        Backend {
            input,
            target,
            names,
            pool: NodeArena::new(),
            segs: SegStack::new(),
            labels: LabelAlloc::new(),
            func_ret: 0,
            frame_len: 0,
            func_ret_used: false,
        }
    }

    /// Process the whole stream. A clean end of input between blocks
    /// finishes the compilation; anywhere else it is a short read.
    pub fn run(&mut self) -> Result<()> {
        self.target.start()?;
        loop {
            let mut tag = [0u8; 2];
            let got = self.input.read(&mut tag[..1])?;
            if got == 0 {
                break;
            }
            self.input.read_exact(&mut tag[1..])?;
            self.process_block(tag)?;
        }
        self.target.end()
    }

    /// Take the target back, for callers that need the output.
    pub fn into_target(self) -> G {
        self.target
    }

    /// Dispatch one block; expression blocks report their result type.
    fn process_block(&mut self, tag: [u8; 2]) -> Result<Option<TypeCode>> {
        if tag[0] != SYNC {
            return Err(Error::Sync(tag[0]));
        }
        match tag[1] {
            BLOCK_EXPR => self.process_expression().map(Some),
            BLOCK_HEADER => self.process_header().map(|_| None),
            BLOCK_DATA => self.process_data().map(|_| None),
            b => Err(Error::UnknownBlock(b)),
        }
    }

    /// Consume blocks until the expression a header promised arrives.
    /// Headers and data blocks may legally interleave ahead of it.
    fn compile_expression(&mut self) -> Result<TypeCode> {
        loop {
            let mut tag = [0u8; 2];
            self.input.read_exact(&mut tag)?;
            if let Some(t) = self.process_block(tag)? {
                return Ok(t);
            }
        }
    }

    /// Load, rewrite, and generate one expression tree, then give its
    /// nodes back to the pool.
    fn process_expression(&mut self) -> Result<TypeCode> {
        let n = load_tree(&mut self.input, &mut self.pool)?;
        let n = rewrite_tree(&mut self.pool, &mut self.target, n)?;
        walk(
            &mut self.pool,
            &self.names,
            &mut self.target,
            &mut self.labels,
            n,
        )?;
        let t = self.pool[n].typ;
        self.pool.release_tree(n);
        Ok(t)
    }

    /// Act on one structural event.
    fn process_header(&mut self) -> Result<()> {
        let h = Header::read(&mut self.input)?;
        match (h.event, h.phase) {
            (HeaderEvent::Export, Phase::Open) => {
                self.target.export(self.names.resolve(h.name)?)?;
            }
            (HeaderEvent::Function, Phase::Open) => {
                self.segs.push(Segment::Code, &mut self.target)?;
                self.target.prologue(self.names.resolve(h.data)?)?;
                self.func_ret = h.name;
                self.func_ret_used = false;
            }
            (HeaderEvent::Frame, Phase::Open) => {
                self.frame_len = h.name;
                self.target.frame(h.name)?;
            }
            (HeaderEvent::Function, Phase::Close) => {
                if self.func_ret_used {
                    self.target.label("_r", h.name as u32)?;
                }
                self.target.epilogue(self.frame_len)?;
                self.segs.pop(&mut self.target)?;
            }
            (HeaderEvent::For, Phase::Open) => {
                // initializer, then the top-of-loop test, then the
                // step expression the body jumps back over
                self.compile_expression()?;
                self.target.label("_c", h.data as u32)?;
                self.compile_expression()?;
                self.target.jump_if_false("_b", h.data as u32)?;
                self.target.jump("_n", h.data as u32)?;
                self.compile_expression()?;
            }
            (HeaderEvent::For, Phase::Close) => {
                self.target.label("_b", h.data as u32)?;
                self.target.jump("_c", h.data as u32)?;
            }
            (HeaderEvent::While, Phase::Open) => {
                self.target.label("_c", h.data as u32)?;
                self.compile_expression()?;
                self.target.jump_if_false("_b", h.data as u32)?;
            }
            (HeaderEvent::While, Phase::Close) => {
                self.target.jump("_c", h.data as u32)?;
                self.target.label("_b", h.data as u32)?;
            }
            (HeaderEvent::Do, Phase::Open) => {
                self.target.label("_c", h.data as u32)?;
            }
            (HeaderEvent::DoWhile, Phase::Open) => {
                self.compile_expression()?;
                self.target.jump_if_true("_c", h.data as u32)?;
            }
            (HeaderEvent::Do, Phase::Close) => {
                self.target.jump("_c", h.data as u32)?;
                self.target.label("_b", h.data as u32)?;
            }
            (HeaderEvent::Break, Phase::Open) => {
                self.target.jump("_b", h.name as u32)?;
            }
            (HeaderEvent::Continue, Phase::Open) => {
                self.target.jump("_c", h.name as u32)?;
            }
            (HeaderEvent::If, Phase::Open) => {
                self.compile_expression()?;
                self.target.jump_if_false("_e", h.name as u32)?;
            }
            (HeaderEvent::Else, Phase::Open) => {
                self.target.jump("_f", h.name as u32)?;
                self.target.label("_e", h.name as u32)?;
            }
            (HeaderEvent::If, Phase::Close) => {
                // with an else the join point is _f, otherwise _e
                if h.data != 0 {
                    self.target.label("_f", h.name as u32)?;
                } else {
                    self.target.label("_e", h.name as u32)?;
                }
            }
            (HeaderEvent::Return, Phase::Open) => {
                self.func_ret_used = true;
            }
            (HeaderEvent::Return, Phase::Close) => {
                self.target.jump("_r", self.func_ret as u32)?;
            }
            (HeaderEvent::Label, Phase::Open) => {
                self.target.label("", h.name as u32)?;
            }
            (HeaderEvent::Goto, Phase::Open) => {
                self.target.jump("", h.name as u32)?;
            }
            (HeaderEvent::Switch, Phase::Open) => {
                let t = self.compile_expression()?;
                self.target.switch_header(h.name, t)?;
            }
            (HeaderEvent::Case, Phase::Open) => {
                self.target.case_label(h.name, h.data)?;
            }
            (HeaderEvent::Default, Phase::Open) => {
                self.target.case_label(h.name, 0)?;
            }
            (HeaderEvent::Switch, Phase::Close) => {
                self.target.label("_b", h.name as u32)?;
            }
            (HeaderEvent::SwitchTab, Phase::Open) => {
                self.segs.push(Segment::Literal, &mut self.target)?;
                self.target.switch_table(h.name, h.data)?;
            }
            (HeaderEvent::SwitchTab, Phase::Close) => {
                self.segs.pop(&mut self.target)?;
            }
            (HeaderEvent::Data, Phase::Open) => {
                self.segs.push(Segment::Data, &mut self.target)?;
                self.target.data_label(self.names.resolve(h.name)?, h.data)?;
            }
            (HeaderEvent::Bss, Phase::Open) => {
                self.segs.push(Segment::Bss, &mut self.target)?;
                self.target.data_label(self.names.resolve(h.name)?, h.data)?;
            }
            (HeaderEvent::Data, Phase::Close) | (HeaderEvent::Bss, Phase::Close) => {
                self.segs.pop(&mut self.target)?;
            }
            (HeaderEvent::String, Phase::Open) => {
                self.segs.push(Segment::Literal, &mut self.target)?;
                self.process_literal(h.name)?;
            }
            (HeaderEvent::String, Phase::Close) => {
                self.segs.pop(&mut self.target)?;
            }
            _ => return Err(Error::BadHeader(h.wire_tag())),
        }
        Ok(())
    }

    /// Emit one static initializer node.
    fn process_data(&mut self) -> Result<()> {
        let n = load_tree(&mut self.input, &mut self.pool)?;
        let node = self.pool[n];
        match node.op {
            Op::Pad => self.target.space(node.value)?,
            Op::Label => self.target.text_data(node.value)?,
            Op::Name => {
                self.target
                    .name_ref(self.names.resolve(node.val2 as u16)?, &node)?;
            }
            Op::CaseLabel => self.target.case_data(node.value, node.val2)?,
            _ => self.target.value(node.typ, node.value)?,
        }
        self.pool.release_tree(n);
        Ok(())
    }

    /// Decode one escaped string literal body into byte values.
    /// A zero byte terminates; 255 escapes the next byte, with the
    /// pair 255 254 standing for an embedded zero.
    fn process_literal(&mut self, id: u16) -> Result<()> {
        self.target.literal(id)?;
        let mut shifted = false;
        loop {
            let mut b = [0u8; 1];
            self.input.read_exact(&mut b)?;
            let mut c = b[0];
            if c == 0 {
                break;
            }
            if c == 255 && !shifted {
                shifted = true;
                continue;
            }
            if shifted && c == 254 {
                c = 0;
            }
            shifted = false;
            self.target.value(TypeCode::UCHAR, c as u32)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn free_nodes(&self) -> usize {
        self.pool.free_count()
    }
}

// ============================================================================
// Tests
// ============================================================================
