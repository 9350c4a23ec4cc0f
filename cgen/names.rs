//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Name table for cgen
//
// The front end writes the names of global and static objects to a
// side file as fixed-width records; everything else travels by small
// integer id. Name ids share a numeric namespace with loop and label
// ids and are distinguished by the reserved base: anything below it
// is not a name.
//

use crate::diag::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// First valid name id; smaller ids belong to loops and labels
pub const NAME_BASE: u16 = 0x8000;
/// Fixed width of one name record in the symbol file
pub const NAME_RECORD: usize = 16;
/// Table capacity; a larger symbol file is fatal
pub const MAX_NAMES: usize = 1024;

// ============================================================================
// Name Table
// ============================================================================

/// Interned identifier strings, loaded once at startup and read-only
/// thereafter. Record i holds the name for id `NAME_BASE + i`.
pub struct NameTable {
    names: Vec<String>,
}

impl NameTable {
    /// Empty table, for streams that reference no names.
    pub fn empty() -> Self {
        NameTable { names: Vec::new() }
    }

    /// Load the symbol file: a 2-byte little-endian byte count, then
    /// exactly that many bytes of fixed-width name records. Records
    /// that fill the full width carry no terminator, so decode by the
    /// declared field length, never by scanning for NUL.
    pub fn load(path: &Path) -> Result<Self> {
        let mut f = File::open(path).map_err(Error::Io)?;
        let mut count = [0u8; 2];
        f.read_exact(&mut count)?;
        let len = u16::from_le_bytes(count) as usize;
        if len % NAME_RECORD != 0 || len / NAME_RECORD > MAX_NAMES {
            return Err(Error::BadSymbolTable);
        }
        let mut bytes = vec![0u8; len];
        f.read_exact(&mut bytes)?;

        let names = bytes
            .chunks_exact(NAME_RECORD)
            .map(|rec| {
                let end = rec.iter().position(|&b| b == 0).unwrap_or(NAME_RECORD);
                String::from_utf8_lossy(&rec[..end]).into_owned()
            })
            .collect();
        Ok(NameTable { names })
    }

    /// Resolve a name id; ids below the reserved base belong to the
    /// other numeric namespace and are fatal here.
    pub fn resolve(&self, id: u16) -> Result<&str> {
        if id < NAME_BASE {
            return Err(Error::BadName(id));
        }
        self.names
            .get((id - NAME_BASE) as usize)
            .map(String::as_str)
            .ok_or(Error::BadName(id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Build a table directly (tests only).
    #[cfg(test)]
    pub fn from_names(names: Vec<String>) -> Self {
        NameTable { names }
    }
}

// ============================================================================
// Tests
// ============================================================================
