use crate::cli::NormalizeArgs;
use crate::error::{CliError, Result};
use pdbshift::core::models::structure::PdbStructure;
use tracing::info;

pub fn run(args: NormalizeArgs) -> Result<()> {
    info!("Loading input structure from {:?}", &args.input);
    let structure = PdbStructure::read(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let loose = structure
        .atoms()
        .filter(|atom| !atom.is_strict_format())
        .count();
    if loose > 0 {
        info!(
            "{} of {} ATOM records were whitespace-delimited and will be rewritten in fixed columns.",
            loose,
            structure.atom_count()
        );
    }

    structure
        .write_file(&args.output)
        .map_err(|e| CliError::FileWriting {
            path: args.output.clone(),
            source: e.into(),
        })?;

    println!(
        "✓ {} written to: {}",
        structure,
        args.output.display()
    );
    Ok(())
}
