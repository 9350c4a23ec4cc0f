//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Output segment tracking for cgen
//
// Header processing brackets each construct with a push/pop pair, and
// the stack only tells the target to switch segments when the active
// one actually changes, so back-to-back data blocks share a single
// directive in the output.
//

use crate::backend::CodeGenerator;
use crate::diag::{Error, Result};
use std::fmt;

/// Nesting limit for segment push/pop pairs
pub const MAX_SEG: usize = 16;

// ============================================================================
// Segment
// ============================================================================

/// One output area of the final object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Code,
    Data,
    Bss,
    Literal,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Code => "code",
            Segment::Data => "data",
            Segment::Bss => "bss",
            Segment::Literal => "literal",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Segment Stack
// ============================================================================

/// Tracks the active segment across nested constructs. The bottom of
/// the stack is the indeterminate pre-output state; popping back to it
/// emits nothing and leaves the last segment active.
pub struct SegStack {
    stack: Vec<Option<Segment>>,
    current: Option<Segment>,
}

impl SegStack {
    pub fn new() -> Self {
        SegStack {
            stack: Vec::new(),
            current: None,
        }
    }

    /// Enter a segment, saving the previous one for the matching pop.
    /// The target's segment hook runs only on an actual change.
    pub fn push(&mut self, seg: Segment, gen: &mut dyn CodeGenerator) -> Result<()> {
        if self.stack.len() == MAX_SEG {
            return Err(Error::SegOverflow);
        }
        self.stack.push(self.current);
        if self.current != Some(seg) {
            gen.segment(seg)?;
            self.current = Some(seg);
        }
        Ok(())
    }

    /// Leave the current segment, restoring whatever was active at the
    /// matching push.
    pub fn pop(&mut self, gen: &mut dyn CodeGenerator) -> Result<()> {
        let prev = self.stack.pop().ok_or(Error::SegUnderflow)?;
        if let Some(seg) = prev {
            if self.current != Some(seg) {
                gen.segment(seg)?;
                self.current = Some(seg);
            }
        }
        Ok(())
    }
}

impl Default for SegStack {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
