//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// End-to-end tests driving the cgen binary with front-end-shaped IR
// streams and checking the generic target's assembly text.
//

use crate::common::{run_cgen, stderr_str, stdout_str, symbol_file, IrStream};
use cgen::ir::{HeaderEvent, NodeRecord, Op, Phase, TypeCode, LVAL};
use cgen::names::NAME_BASE;

fn constant(value: u32) -> NodeRecord {
    NodeRecord {
        op: Op::Constant.wire(),
        typ: TypeCode::CSHORT.0,
        value,
        ..Default::default()
    }
}

#[test]
fn test_empty_stream_ends_cleanly() {
    let sym = symbol_file(&[]);
    let out = run_cgen(&[sym.path().to_str().unwrap()], &[]);
    assert!(out.status.success());
    assert_eq!(stdout_str(&out), "\t.end\n");
}

#[test]
fn test_exported_function_shell() {
    let sym = symbol_file(&["main"]);
    let stream = IrStream::new()
        .header(HeaderEvent::Export, Phase::Open, NAME_BASE, 0)
        .header(HeaderEvent::Function, Phase::Open, 1, NAME_BASE)
        .header(HeaderEvent::Frame, Phase::Open, 2, 0)
        .header(HeaderEvent::Function, Phase::Close, 1, 0)
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    assert_eq!(
        stdout_str(&out),
        "\t.export _main\n\
         \t.code\n\
         _main:\n\
         \tfenter 2\n\
         \tfexit 2\n\
         \tret\n\
         \t.end\n"
    );
}

#[test]
fn test_expression_lowers_to_helper_calls() {
    let sym = symbol_file(&[]);
    let stream = IrStream::new()
        .expr(&[
            NodeRecord {
                left: 1,
                right: 1,
                op: Op::Plus.wire(),
                typ: TypeCode::CSHORT.0,
                ..Default::default()
            },
            constant(1),
            constant(2),
        ])
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    assert_eq!(
        stdout_str(&out),
        "\tcall __const\n\
         \t.word 1\n\
         \tcall __push\n\
         \tcall __const\n\
         \t.word 2\n\
         \tcall __plus\n\
         \t.end\n"
    );
}

#[test]
fn test_assignment_through_lvalue_rewrite() {
    // x = 3 with x an lvalue name; the rewrite makes the left side an
    // address load and the store goes through the assign helper
    let sym = symbol_file(&["x"]);
    let stream = IrStream::new()
        .expr(&[
            NodeRecord {
                left: 1,
                right: 1,
                op: Op::Assign.wire(),
                typ: TypeCode::CSHORT.0,
                ..Default::default()
            },
            NodeRecord {
                op: Op::Name.wire(),
                typ: TypeCode::CSHORT.0,
                flags: LVAL,
                val2: NAME_BASE as u32,
                ..Default::default()
            },
            constant(3),
        ])
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    let text = stdout_str(&out);
    assert!(text.contains("\tcall __loadn\n\t.word _x\n"));
    // the rewritten name is a pointer, so the push is word sized
    assert!(text.contains("\tcall __push\n"));
    assert!(text.contains("\tcall __assign\n"));
}

#[test]
fn test_if_else_labels() {
    let sym = symbol_file(&[]);
    let stream = IrStream::new()
        .header(HeaderEvent::If, Phase::Open, 3, 0)
        .expr(&[constant(1)])
        .header(HeaderEvent::Else, Phase::Open, 3, 0)
        .header(HeaderEvent::If, Phase::Close, 3, 1)
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    let text = stdout_str(&out);
    assert!(text.contains("\tjz _e3\n"));
    assert!(text.contains("\tjmp _f3\n_e3:\n"));
    assert!(text.ends_with("_f3:\n\t.end\n"));
}

#[test]
fn test_while_loop_shape() {
    let sym = symbol_file(&[]);
    let stream = IrStream::new()
        .header(HeaderEvent::While, Phase::Open, 0, 5)
        .expr(&[constant(1)])
        .header(HeaderEvent::While, Phase::Close, 0, 5)
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    let text = stdout_str(&out);
    assert!(text.starts_with("_c5:\n"));
    assert!(text.contains("\tjz _b5\n"));
    assert!(text.contains("\tjmp _c5\n_b5:\n"));
}

#[test]
fn test_string_literal_bytes() {
    let sym = symbol_file(&[]);
    let stream = IrStream::new()
        .header(HeaderEvent::String, Phase::Open, 4, 0)
        .raw(&[b'H', b'i', 255, 254, 0])
        .header(HeaderEvent::String, Phase::Close, 4, 0)
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    assert_eq!(
        stdout_str(&out),
        "\t.literal\nT4:\n\t.byte 72\n\t.byte 105\n\t.byte 0\n\t.end\n"
    );
}

#[test]
fn test_data_block_with_name_reference() {
    let sym = symbol_file(&["tab", "other"]);
    let stream = IrStream::new()
        .header(HeaderEvent::Data, Phase::Open, NAME_BASE, 2)
        .data(constant(42))
        .data(NodeRecord {
            op: Op::Name.wire(),
            typ: TypeCode::CSHORT.0,
            value: 4,
            val2: (NAME_BASE + 1) as u32,
            ..Default::default()
        })
        .data(NodeRecord {
            op: Op::Pad.wire(),
            value: 10,
            ..Default::default()
        })
        .header(HeaderEvent::Data, Phase::Close, NAME_BASE, 0)
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    assert_eq!(
        stdout_str(&out),
        "\t.data\n\t.align 2\n_tab:\n\t.word 42\n\t.word _other+4\n\t.ds 10\n\t.end\n"
    );
}

#[test]
fn test_switch_with_table() {
    let sym = symbol_file(&[]);
    let stream = IrStream::new()
        .header(HeaderEvent::Switch, Phase::Open, 6, 0)
        .expr(&[constant(1)])
        .header(HeaderEvent::Case, Phase::Open, 6, 1)
        .header(HeaderEvent::Default, Phase::Open, 6, 0)
        .header(HeaderEvent::Switch, Phase::Close, 6, 0)
        .header(HeaderEvent::SwitchTab, Phase::Open, 6, 2)
        .data(NodeRecord {
            op: Op::CaseLabel.wire(),
            value: 6,
            val2: 1,
            ..Default::default()
        })
        .header(HeaderEvent::SwitchTab, Phase::Close, 6, 0)
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(out.status.success(), "stderr: {}", stderr_str(&out));
    let text = stdout_str(&out);
    assert!(text.contains("\tcall __switch\n\t.word Sw6\n"));
    assert!(text.contains("Sw6_1:\n"));
    assert!(text.contains("Sw6_0:\n"));
    assert!(text.contains("_b6:\n"));
    assert!(text.contains("\t.literal\nSw6:\n\t.word 2\n\t.word Sw6_1\n"));
}

#[test]
fn test_lost_sync_fails() {
    let sym = symbol_file(&[]);
    let out = run_cgen(&[sym.path().to_str().unwrap()], &[b'A', b'^']);
    assert!(!out.status.success());
    assert!(stderr_str(&out).contains("cgen: error: sync lost"));
}

#[test]
fn test_unknown_block_fails() {
    let sym = symbol_file(&[]);
    let out = run_cgen(&[sym.path().to_str().unwrap()], &[b'%', b'?']);
    assert!(!out.status.success());
    assert!(stderr_str(&out).contains("cgen: error: unknown block"));
}

#[test]
fn test_bad_name_id_fails() {
    let sym = symbol_file(&["x"]);
    let stream = IrStream::new()
        .expr(&[NodeRecord {
            op: Op::Name.wire(),
            typ: TypeCode::CSHORT.0,
            val2: 3, // below the name id base
            ..Default::default()
        }])
        .into_bytes();
    let out = run_cgen(&[sym.path().to_str().unwrap()], &stream);
    assert!(!out.status.success());
    assert!(stderr_str(&out).contains("cgen: error: bad name"));
}

#[test]
fn test_missing_symbol_file_fails() {
    let out = run_cgen(&["/nonexistent/cgen-symtab"], &[]);
    assert!(!out.status.success());
    assert!(stderr_str(&out).contains("cgen: error:"));
}

#[test]
fn test_unknown_target_fails() {
    let sym = symbol_file(&[]);
    let out = run_cgen(&["-t", "vax", sym.path().to_str().unwrap()], &[]);
    assert!(!out.status.success());
    assert!(stderr_str(&out).contains("unknown target 'vax'"));
}

#[test]
fn test_print_targets() {
    let out = run_cgen(&["--print-targets"], &[]);
    assert!(out.status.success());
    assert!(stdout_str(&out).contains("generic"));
}
