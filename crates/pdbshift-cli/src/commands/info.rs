use crate::cli::InfoArgs;
use crate::error::{CliError, Result};
use pdbshift::core::models::structure::PdbStructure;
use std::fmt::Write;
use tracing::info;

pub fn run(args: InfoArgs) -> Result<()> {
    info!("Loading input structure from {:?}", &args.input);
    let structure = PdbStructure::read(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    print!("{}", render_summary(&structure, args.residues));
    Ok(())
}

fn render_summary(structure: &PdbStructure, list_residues: bool) -> String {
    let mut out = String::new();
    let strict = structure
        .atoms()
        .filter(|atom| atom.is_strict_format())
        .count();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", structure);
    let _ = writeln!(
        out,
        "  {} header line(s), {} footer line(s), {} of {} records in fixed columns",
        structure.header().len(),
        structure.footer().len(),
        strict,
        structure.atom_count()
    );

    for (_, chain) in structure.chains() {
        let _ = writeln!(out, "  {}", chain);
        if list_residues {
            for residue in chain {
                let local_id = residue.chain_local_id().unwrap_or_default();
                let _ = writeln!(out, "    {:>4}  {}", local_id, residue);
            }
        }
    }
    out
}
