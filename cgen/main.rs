//
// Copyright (c) 2026 the cgen authors
//
// This file is part of the cgen project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//
// cgen - second-stage code generator
//
// Reads the front end's intermediate stream on stdin and writes
// assembly text for the selected target on stdout. The only file
// argument is the symbol table the front end wrote alongside the
// stream.
//

use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use std::io;
use std::path::Path;

use cgen::driver::Backend;
use cgen::names::NameTable;
use cgen::{arch, diag};

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser)]
#[command(version, about = gettext("cgen - generate assembly from compiler intermediate code"))]
struct Args {
    /// Symbol table file written by the front end
    #[arg(required_unless_present = "print_targets")]
    symtab: Option<String>,

    /// Target architecture
    #[arg(
        short = 't',
        long = "target",
        default_value = "generic",
        value_name = "name",
        help = gettext("Target architecture")
    )]
    target: String,

    /// Print registered targets
    #[arg(long = "print-targets", help = gettext("Display available target architectures"))]
    print_targets: bool,
}

fn run(args: &Args) -> diag::Result<()> {
    // required_unless_present guarantees the path is there
    let symtab = args.symtab.as_deref().unwrap_or_default();
    let names = NameTable::load(Path::new(symtab))?;
    let target = arch::create(&args.target, io::stdout().lock())?;
    let mut backend = Backend::new(io::stdin().lock(), names, target);
    backend.run()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setlocale(LocaleCategory::LcAll, "");
    textdomain("cgen")?;
    bind_textdomain_codeset("cgen", "UTF-8")?;

    let args = Args::parse();

    if args.print_targets {
        println!("  Registered Targets:");
        for name in arch::TARGETS {
            println!("    {}", name);
        }
        return Ok(());
    }

    if let Err(e) = run(&args) {
        eprintln!("cgen: error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
