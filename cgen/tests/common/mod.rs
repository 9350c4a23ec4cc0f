//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Shared helpers for cgen integration tests: a byte-level IR stream
// builder standing in for the front end, and a runner that feeds the
// stream to the real binary.
//

use cgen::ir::{
    Header, HeaderEvent, NodeRecord, Phase, BLOCK_DATA, BLOCK_EXPR, BLOCK_HEADER, SYNC,
};
use cgen::names::NAME_RECORD;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

/// Front-end-shaped IR stream under construction.
pub struct IrStream {
    bytes: Vec<u8>,
}

impl IrStream {
    pub fn new() -> Self {
        IrStream { bytes: Vec::new() }
    }

    pub fn header(mut self, event: HeaderEvent, phase: Phase, name: u16, data: u16) -> Self {
        self.bytes.push(SYNC);
        self.bytes.push(BLOCK_HEADER);
        Header::new(event, phase, name, data)
            .write(&mut self.bytes)
            .unwrap();
        self
    }

    /// Expression block from pre-order node records.
    pub fn expr(mut self, records: &[NodeRecord]) -> Self {
        self.bytes.push(SYNC);
        self.bytes.push(BLOCK_EXPR);
        for rec in records {
            rec.write(&mut self.bytes).unwrap();
        }
        self
    }

    /// Data block holding one node.
    pub fn data(mut self, record: NodeRecord) -> Self {
        self.bytes.push(SYNC);
        self.bytes.push(BLOCK_DATA);
        record.write(&mut self.bytes).unwrap();
        self
    }

    /// Raw bytes, for literal bodies and deliberate corruption.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Write a symbol file the way the front end does: a 2-byte length
/// then fixed-width name records.
pub fn symbol_file(names: &[&str]) -> NamedTempFile {
    let mut body = Vec::new();
    for name in names {
        let mut rec = [0u8; NAME_RECORD];
        rec[..name.len()].copy_from_slice(name.as_bytes());
        body.extend_from_slice(&rec);
    }
    let mut file = NamedTempFile::new().expect("failed to create symbol file");
    file.write_all(&(body.len() as u16).to_le_bytes()).unwrap();
    file.write_all(&body).unwrap();
    file
}

/// Run the cgen binary on a stream and capture everything.
pub fn run_cgen(args: &[&str], stdin_bytes: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cgen"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn cgen");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin_bytes)
        .unwrap();
    child.wait_with_output().expect("failed to wait for cgen")
}

pub fn stdout_str(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

pub fn stderr_str(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}
