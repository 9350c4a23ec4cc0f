//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Diagnostics for cgen
//
// Every fault in this backend is fatal by design: the IR stream comes
// from a front end that is assumed well formed, so any deviation is a
// build-system bug rather than a user-recoverable condition. The one
// exception is the lvalue-rewrite type-range check, which only warns.
//

use std::fmt;
use std::io;

// ============================================================================
// Error
// ============================================================================

/// Fatal backend fault.
#[derive(Debug)]
pub enum Error {
    /// Underlying I/O failure on the IR stream or symbol file
    Io(io::Error),
    /// A read ended before the full record arrived
    ShortRead,
    /// First byte of a block tag was not the sync marker
    Sync(u8),
    /// Second byte of a block tag selected no known block kind
    UnknownBlock(u8),
    /// Header record carried an unrecognized event tag
    BadHeader(u16),
    /// Tree node carried an unrecognized operator tag
    InvalidOp(u16),
    /// A cleanup node reached the generic emitter
    StrayCleanup,
    /// Node arena exhausted
    NodeLimit,
    /// Expression tree nested past the recursion guard
    TreeTooDeep,
    /// Segment stack overflow
    SegOverflow,
    /// Segment stack underflow
    SegUnderflow,
    /// Name id below the reserved name-id base, or past the table
    BadName(u16),
    /// Symbol file failed structural sanity checks
    BadSymbolTable,
    /// No such target code generator
    UnknownTarget(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::ShortRead => write!(f, "short read"),
            Error::Sync(b) => write!(f, "sync lost (byte {:#04x})", b),
            Error::UnknownBlock(b) => write!(f, "unknown block {:#04x}", b),
            Error::BadHeader(t) => write!(f, "bad header {:#06x}", t),
            Error::InvalidOp(op) => write!(f, "invalid op {:#06x}", op),
            Error::StrayCleanup => write!(f, "stray cleanup node"),
            Error::NodeLimit => write!(f, "too many nodes"),
            Error::TreeTooDeep => write!(f, "expression tree too deep"),
            Error::SegOverflow => write!(f, "segment stack overflow"),
            Error::SegUnderflow => write!(f, "segment stack underflow"),
            Error::BadName(id) => write!(f, "bad name {:#06x}", id),
            Error::BadSymbolTable => write!(f, "bad symbol table"),
            Error::UnknownTarget(name) => write!(f, "unknown target '{}'", name),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::ShortRead
        } else {
            Error::Io(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Warnings
// ============================================================================

/// Print a non-fatal diagnostic and continue.
pub fn warning(msg: &str) {
    eprintln!("cgen: warning: {}", msg);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_read_from_io() {
        let e = Error::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(e, Error::ShortRead));
    }

    #[test]
    fn test_other_io_is_preserved() {
        let e = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "no"));
        assert!(matches!(e, Error::Io(_)));
    }

    #[test]
    fn test_display_one_line() {
        let msgs = [
            Error::ShortRead.to_string(),
            Error::Sync(0x41).to_string(),
            Error::BadHeader(0x8022).to_string(),
        ];
        for m in msgs {
            assert!(!m.contains('\n'));
        }
        assert_eq!(Error::Sync(0x41).to_string(), "sync lost (byte 0x41)");
    }
}
