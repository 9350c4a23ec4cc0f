//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Generic reference target for cgen
//
// A plain stack-machine rendition with no instruction selection at
// all: every operator falls through to the helper library and every
// hook prints one pseudo-assembly directive. Real targets accept the
// try_* hooks to replace helper calls with native sequences; this one
// exists to exercise the core and to document the output contract.
//

use crate::backend::CodeGenerator;
use crate::codegen::helper_suffix;
use crate::diag::Result;
use crate::ir::TypeCode;
use crate::node::{Node, NodeArena, NodeId};
use crate::segment::Segment;
use std::io::Write;

pub struct GenericCodeGen<W: Write> {
    out: W,
}

impl<W: Write> GenericCodeGen<W> {
    pub fn new(out: W) -> Self {
        GenericCodeGen { out }
    }

    /// Directive for a value of the given type in a data area.
    fn value_directive(t: TypeCode) -> &'static str {
        if t.is_ptr() {
            return ".word";
        }
        match t.base() {
            TypeCode::CCHAR | TypeCode::UCHAR => ".byte",
            TypeCode::CLONG | TypeCode::ULONG | TypeCode::FLOAT | TypeCode::DOUBLE => ".long",
            _ => ".word",
        }
    }
}

impl<W: Write> CodeGenerator for GenericCodeGen<W> {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        writeln!(self.out, "\t.end")?;
        Ok(())
    }

    fn segment(&mut self, seg: Segment) -> Result<()> {
        writeln!(self.out, "\t.{}", seg)?;
        Ok(())
    }

    fn prologue(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "_{}:", name)?;
        Ok(())
    }

    fn frame(&mut self, size: u16) -> Result<()> {
        writeln!(self.out, "\tfenter {}", size)?;
        Ok(())
    }

    fn epilogue(&mut self, frame: u16) -> Result<()> {
        writeln!(self.out, "\tfexit {}", frame)?;
        writeln!(self.out, "\tret")?;
        Ok(())
    }

    fn label(&mut self, prefix: &str, id: u32) -> Result<()> {
        writeln!(self.out, "{}{}:", prefix, id)?;
        Ok(())
    }

    fn jump(&mut self, prefix: &str, id: u32) -> Result<()> {
        writeln!(self.out, "\tjmp {}{}", prefix, id)?;
        Ok(())
    }

    fn jump_if_true(&mut self, prefix: &str, id: u32) -> Result<()> {
        writeln!(self.out, "\tjnz {}{}", prefix, id)?;
        Ok(())
    }

    fn jump_if_false(&mut self, prefix: &str, id: u32) -> Result<()> {
        writeln!(self.out, "\tjz {}{}", prefix, id)?;
        Ok(())
    }

    fn export(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "\t.export _{}", name)?;
        Ok(())
    }

    fn data_label(&mut self, name: &str, size: u16) -> Result<()> {
        if size > 1 {
            writeln!(self.out, "\t.align {}", size)?;
        }
        writeln!(self.out, "_{}:", name)?;
        Ok(())
    }

    fn text_data(&mut self, id: u32) -> Result<()> {
        writeln!(self.out, "\t.word T{}", id)?;
        Ok(())
    }

    fn space(&mut self, size: u32) -> Result<()> {
        writeln!(self.out, "\t.ds {}", size)?;
        Ok(())
    }

    fn value(&mut self, typ: TypeCode, value: u32) -> Result<()> {
        writeln!(self.out, "\t{} {}", Self::value_directive(typ), value)?;
        Ok(())
    }

    fn name_ref(&mut self, name: &str, node: &Node) -> Result<()> {
        if node.value != 0 {
            writeln!(self.out, "\t.word _{}+{}", name, node.value)?;
        } else {
            writeln!(self.out, "\t.word _{}", name)?;
        }
        Ok(())
    }

    fn switch_header(&mut self, id: u16, typ: TypeCode) -> Result<()> {
        writeln!(self.out, "\tcall __switch{}", helper_suffix(typ))?;
        writeln!(self.out, "\t.word Sw{}", id)?;
        Ok(())
    }

    fn case_label(&mut self, id: u16, value: u16) -> Result<()> {
        writeln!(self.out, "Sw{}_{}:", id, value)?;
        Ok(())
    }

    fn case_data(&mut self, id: u32, value: u32) -> Result<()> {
        writeln!(self.out, "\t.word Sw{}_{}", id, value)?;
        Ok(())
    }

    fn switch_table(&mut self, id: u16, size: u16) -> Result<()> {
        writeln!(self.out, "Sw{}:", id)?;
        writeln!(self.out, "\t.word {}", size)?;
        Ok(())
    }

    fn literal(&mut self, id: u16) -> Result<()> {
        writeln!(self.out, "T{}:", id)?;
        Ok(())
    }

    // helper calls come out as "call __name"; the core writes the
    // name and trailing newline through output()
    fn pre_call(&mut self, _pool: &NodeArena, _n: NodeId) -> Result<()> {
        write!(self.out, "\tcall __")?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
