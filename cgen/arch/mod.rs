//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Target selection for cgen
//

use crate::diag::{Error, Result};
use std::io::Write;

pub mod generic;

pub use generic::GenericCodeGen;

/// Names accepted by create(), in listing order
pub const TARGETS: &[&str] = &["generic"];

/// Instantiate the named target over an output stream.
pub fn create<W: Write>(name: &str, out: W) -> Result<GenericCodeGen<W>> {
    match name {
        "generic" => Ok(GenericCodeGen::new(out)),
        _ => Err(Error::UnknownTarget(name.to_string())),
    }
}
