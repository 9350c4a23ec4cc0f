//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// Library interface for cgen
//
// cgen is the architecture-independent half of a two-stage compiler.
// A front end writes a serialized intermediate representation to the
// backend's stdin; this crate reconstructs per-statement expression
// trees from that stream, applies the semantic-lowering rewrites, and
// drives a target code generator through the CodeGenerator trait to
// produce assembly text.
//

pub mod arch;
pub mod backend;
pub mod codegen;
pub mod diag;
pub mod driver;
pub mod ir;
pub mod names;
pub mod node;
pub mod rewrite;
pub mod segment;
