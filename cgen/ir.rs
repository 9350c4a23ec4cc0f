//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// IR wire protocol for cgen
//
// The front end and this backend are two halves of one pipeline with
// matched framing. The stream is a sequence of 2-byte tagged records:
// the first byte is always the sync marker, the second selects an
// expression, header, or data block. Header blocks carry a fixed
// 6-byte record; expression and data blocks carry a pre-order encoded
// tree of fixed 22-byte node records. Both codec halves live here so
// the test suite (and a front end) can produce streams as well as
// consume them.
//

use crate::diag::{Error, Result};
use std::fmt;
use std::io::{Read, Write};

// ============================================================================
// Block Framing
// ============================================================================

/// Sync marker; every block tag starts with this byte
pub const SYNC: u8 = b'%';
/// Expression block: a pre-order tree follows
pub const BLOCK_EXPR: u8 = b'^';
/// Header block: a structural event record follows
pub const BLOCK_HEADER: u8 = b'H';
/// Data block: a single-node tree describing static data follows
pub const BLOCK_DATA: u8 = b'[';

// ============================================================================
// Node Flags
// ============================================================================

/// Node is an addressable storage location
pub const LVAL: u16 = 0x0001;
/// Node is known to produce a 0/1 boolean result
pub const ISBOOL: u16 = 0x0002;
/// Process-side evidence that the lvalue rewrite already ran.
/// Never valid on the wire; cleared on load.
pub const REWRITTEN: u16 = 0x8000;
/// Mask of flag bits a front end may legally set
pub const WIRE_FLAGS: u16 = 0x7fff;

// ============================================================================
// Operators
// ============================================================================

/// Expression tree operator tags.
///
/// The numeric values are the wire encoding shared with the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Op {
    Null = 0,
    Name = 1,
    Constant = 2,
    Label = 3,
    Local = 4,
    Argument = 5,
    Comma = 6,
    ArgComma = 7,
    Assign = 8,
    Plus = 9,
    Minus = 10,
    Star = 11,
    Slash = 12,
    Percent = 13,
    And = 14,
    Or = 15,
    Hat = 16,
    Shl = 17,
    Shr = 18,
    OrOr = 19,
    AndAnd = 20,
    Bang = 21,
    Tilde = 22,
    Negate = 23,
    Deref = 24,
    Bool = 25,
    Question = 26,
    Colon = 27,
    EqEq = 28,
    BangEq = 29,
    Lt = 30,
    Gt = 31,
    LtEq = 32,
    GtEq = 33,
    PlusEq = 34,
    MinusEq = 35,
    StarEq = 36,
    SlashEq = 37,
    PercentEq = 38,
    AndEq = 39,
    OrEq = 40,
    HatEq = 41,
    ShlEq = 42,
    ShrEq = 43,
    PostInc = 44,
    PostDec = 45,
    FuncCall = 46,
    Cleanup = 47,
    Cast = 48,
    Pad = 49,
    CaseLabel = 50,
}

/// Control-flow category for operators the tree walk must lower to
/// branches instead of materializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branching {
    Or,
    And,
    Colon,
    Question,
}

impl Op {
    /// Wire encoding of this operator
    pub fn wire(self) -> u16 {
        self as u16
    }

    /// Decode a wire operator tag
    pub fn from_wire(v: u16) -> Option<Op> {
        use Op::*;
        Some(match v {
            0 => Null,
            1 => Name,
            2 => Constant,
            3 => Label,
            4 => Local,
            5 => Argument,
            6 => Comma,
            7 => ArgComma,
            8 => Assign,
            9 => Plus,
            10 => Minus,
            11 => Star,
            12 => Slash,
            13 => Percent,
            14 => And,
            15 => Or,
            16 => Hat,
            17 => Shl,
            18 => Shr,
            19 => OrOr,
            20 => AndAnd,
            21 => Bang,
            22 => Tilde,
            23 => Negate,
            24 => Deref,
            25 => Bool,
            26 => Question,
            27 => Colon,
            28 => EqEq,
            29 => BangEq,
            30 => Lt,
            31 => Gt,
            32 => LtEq,
            33 => GtEq,
            34 => PlusEq,
            35 => MinusEq,
            36 => StarEq,
            37 => SlashEq,
            38 => PercentEq,
            39 => AndEq,
            40 => OrEq,
            41 => HatEq,
            42 => ShlEq,
            43 => ShrEq,
            44 => PostInc,
            45 => PostDec,
            46 => FuncCall,
            47 => Cleanup,
            48 => Cast,
            49 => Pad,
            50 => CaseLabel,
            _ => return None,
        })
    }

    /// Control-flow category, computed once at the operator definition
    /// rather than re-derived by identity comparison at dispatch time.
    pub fn branching(self) -> Option<Branching> {
        match self {
            Op::OrOr => Some(Branching::Or),
            Op::AndAnd => Some(Branching::And),
            Op::Colon => Some(Branching::Colon),
            Op::Question => Some(Branching::Question),
            _ => None,
        }
    }
}

// ============================================================================
// Type Codes
// ============================================================================

/// Semantic type tag carried by every node.
///
/// The low nibble counts pointer indirections, so "pointer to" is a
/// plain increment. The remaining bits select the base class. Values
/// at or above [`TypeCode::AGGREGATE_BASE`] are reserved for
/// struct/union references assigned by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCode(pub u16);

impl TypeCode {
    pub const CCHAR: TypeCode = TypeCode(0x0000);
    pub const UCHAR: TypeCode = TypeCode(0x0010);
    pub const CSHORT: TypeCode = TypeCode(0x0020);
    pub const UINT: TypeCode = TypeCode(0x0030);
    pub const CLONG: TypeCode = TypeCode(0x0040);
    pub const ULONG: TypeCode = TypeCode(0x0050);
    pub const FLOAT: TypeCode = TypeCode(0x0060);
    pub const DOUBLE: TypeCode = TypeCode(0x0070);
    pub const VOID: TypeCode = TypeCode(0x0080);
    pub const FUNCTION: TypeCode = TypeCode(0x0090);
    /// The generic pointer type all function values decay to
    pub const PTRTO: TypeCode = TypeCode(0x0081);
    /// Start of the front-end-assigned struct/union range
    pub const AGGREGATE_BASE: u16 = 0x4000;

    /// True when at least one level of indirection is present
    pub fn is_ptr(self) -> bool {
        self.0 & 0x000f != 0
    }

    /// Add one level of indirection; wraps modularly like the C
    /// increment so a saturated wire type cannot panic the rewrite
    pub fn ptr_to(self) -> TypeCode {
        TypeCode(self.0.wrapping_add(1))
    }

    /// Base class with the indirection nibble cleared
    pub fn base(self) -> TypeCode {
        TypeCode(self.0 & !0x000f)
    }

    pub fn is_function(self) -> bool {
        self.0 == Self::FUNCTION.0
    }

    pub fn in_aggregate_range(self) -> bool {
        self.0 >= Self::AGGREGATE_BASE
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

// ============================================================================
// Node Record Codec
// ============================================================================

/// Fixed-size wire form of one tree node.
///
/// The child words are old front-end pointers or zero; the numeric
/// values are never addresses on this side, only present/absent flags
/// telling the loader whether a child record follows in pre-order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeRecord {
    pub left: u32,
    pub right: u32,
    pub op: u16,
    pub typ: u16,
    pub flags: u16,
    pub value: u32,
    pub val2: u32,
}

impl NodeRecord {
    /// Serialized size in bytes
    pub const SIZE: usize = 22;

    /// Read one record; a short read is fatal.
    pub fn read(r: &mut impl Read) -> Result<NodeRecord> {
        let mut b = [0u8; Self::SIZE];
        r.read_exact(&mut b)?;
        Ok(NodeRecord {
            left: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            right: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            op: u16::from_le_bytes([b[8], b[9]]),
            typ: u16::from_le_bytes([b[10], b[11]]),
            flags: u16::from_le_bytes([b[12], b[13]]),
            value: u32::from_le_bytes([b[14], b[15], b[16], b[17]]),
            val2: u32::from_le_bytes([b[18], b[19], b[20], b[21]]),
        })
    }

    /// Write one record in wire form.
    pub fn write(&self, w: &mut impl Write) -> std::io::Result<()> {
        let mut b = [0u8; Self::SIZE];
        b[0..4].copy_from_slice(&self.left.to_le_bytes());
        b[4..8].copy_from_slice(&self.right.to_le_bytes());
        b[8..10].copy_from_slice(&self.op.to_le_bytes());
        b[10..12].copy_from_slice(&self.typ.to_le_bytes());
        b[12..14].copy_from_slice(&self.flags.to_le_bytes());
        b[14..18].copy_from_slice(&self.value.to_le_bytes());
        b[18..22].copy_from_slice(&self.val2.to_le_bytes());
        w.write_all(&b)
    }
}

// ============================================================================
// Header Record Codec
// ============================================================================

/// Footer bit marking the closing half of a bracketed construct
pub const H_FOOTER: u16 = 0x8000;

/// Structural event kind carried by a header record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderEvent {
    Export,
    Function,
    Frame,
    For,
    While,
    Do,
    DoWhile,
    Break,
    Continue,
    If,
    Else,
    Return,
    Label,
    Goto,
    Switch,
    Case,
    Default,
    SwitchTab,
    Data,
    Bss,
    String,
}

/// Open/close phase of a bracketed construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Open,
    Close,
}

impl HeaderEvent {
    /// Wire tag (without the footer bit)
    pub fn wire(self) -> u16 {
        use HeaderEvent::*;
        match self {
            Export => 1,
            Function => 2,
            Frame => 3,
            For => 4,
            While => 5,
            Do => 6,
            DoWhile => 7,
            Break => 8,
            Continue => 9,
            If => 10,
            Else => 11,
            Return => 12,
            Label => 13,
            Goto => 14,
            Switch => 15,
            Case => 16,
            Default => 17,
            SwitchTab => 18,
            Data => 19,
            Bss => 20,
            String => 21,
        }
    }

    fn from_wire(v: u16) -> Option<HeaderEvent> {
        use HeaderEvent::*;
        Some(match v {
            1 => Export,
            2 => Function,
            3 => Frame,
            4 => For,
            5 => While,
            6 => Do,
            7 => DoWhile,
            8 => Break,
            9 => Continue,
            10 => If,
            11 => Else,
            12 => Return,
            13 => Label,
            14 => Goto,
            15 => Switch,
            16 => Case,
            17 => Default,
            18 => SwitchTab,
            19 => Data,
            20 => Bss,
            21 => String,
            _ => return None,
        })
    }
}

/// One decoded structural event: a flat instruction describing a
/// control-flow or storage-area boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub event: HeaderEvent,
    pub phase: Phase,
    /// Name-like numeric field (name id, loop id, or label id)
    pub name: u16,
    /// Data numeric field (frame size, else-present flag, table size)
    pub data: u16,
}

impl Header {
    /// Serialized size in bytes
    pub const SIZE: usize = 6;

    pub fn new(event: HeaderEvent, phase: Phase, name: u16, data: u16) -> Header {
        Header {
            event,
            phase,
            name,
            data,
        }
    }

    /// Read and decode one header record; unknown event tags are fatal.
    pub fn read(r: &mut impl Read) -> Result<Header> {
        let mut b = [0u8; Self::SIZE];
        r.read_exact(&mut b)?;
        let tag = u16::from_le_bytes([b[0], b[1]]);
        let event = HeaderEvent::from_wire(tag & !H_FOOTER).ok_or(Error::BadHeader(tag))?;
        let phase = if tag & H_FOOTER != 0 {
            Phase::Close
        } else {
            Phase::Open
        };
        Ok(Header {
            event,
            phase,
            name: u16::from_le_bytes([b[2], b[3]]),
            data: u16::from_le_bytes([b[4], b[5]]),
        })
    }

    /// Raw wire tag, footer bit included
    pub fn wire_tag(&self) -> u16 {
        match self.phase {
            Phase::Open => self.event.wire(),
            Phase::Close => self.event.wire() | H_FOOTER,
        }
    }

    /// Write one record in wire form.
    pub fn write(&self, w: &mut impl Write) -> std::io::Result<()> {
        let mut b = [0u8; Self::SIZE];
        b[0..2].copy_from_slice(&self.wire_tag().to_le_bytes());
        b[2..4].copy_from_slice(&self.name.to_le_bytes());
        b[4..6].copy_from_slice(&self.data.to_le_bytes());
        w.write_all(&b)
    }
}

// ============================================================================
// Tests
// ============================================================================
