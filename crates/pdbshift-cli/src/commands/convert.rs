use crate::cli::{ConvertArgs, Target};
use crate::config::PartialCliConfig;
use crate::error::{CliError, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pdbshift::core::models::structure::PdbStructure;
use pdbshift::workflows::{
    self,
    config::{ConversionConfig, ConversionDirection},
    convert::ConversionReport,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

struct ConversionJob {
    input: PathBuf,
    output: PathBuf,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let partial_config = PartialCliConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let jobs = plan_jobs(&args.inputs, args.output.as_deref(), config.direction)?;
    info!(
        "Converting {} file(s) ({}, cap change {}).",
        jobs.len(),
        config.direction,
        if config.cap_change { "on" } else { "off" }
    );

    let pb = ProgressBar::new(jobs.len() as u64)
        .with_style(bar_style())
        .with_message("Converting");
    pb.set_draw_target(ProgressDrawTarget::stderr());

    let results: Vec<Result<ConversionReport>> = jobs
        .par_iter()
        .map(|job| {
            let result = convert_file(&job.input, &job.output, &config);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_and_clear();

    let mut total = ConversionReport::default();
    let mut failures = 0usize;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(report) => {
                println!(
                    "✓ {} -> {} ({})",
                    job.input.display(),
                    job.output.display(),
                    report
                );
                total += report;
            }
            Err(e) => {
                error!("{}", e);
                eprintln!("✗ {}", e);
                failures += 1;
            }
        }
    }

    info!(
        "Converted {} of {} file(s): {}.",
        jobs.len() - failures,
        jobs.len(),
        total
    );
    if failures > 0 {
        return Err(CliError::Other(anyhow::anyhow!(
            "{} of {} file(s) failed to convert",
            failures,
            jobs.len()
        )));
    }
    Ok(())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Reads, converts and writes one file. Each call owns its structure.
fn convert_file(input: &Path, output: &Path, config: &ConversionConfig) -> Result<ConversionReport> {
    let mut structure = PdbStructure::read(input).map_err(|e| CliError::FileParsing {
        path: input.to_path_buf(),
        source: e.into(),
    })?;

    let report =
        workflows::convert::run(&mut structure, config).map_err(|source| CliError::Conversion {
            path: input.to_path_buf(),
            source,
        })?;

    structure
        .write_file(output)
        .map_err(|e| CliError::FileWriting {
            path: output.to_path_buf(),
            source: e.into(),
        })?;
    info!("Wrote {} to {:?}", structure, output);
    Ok(report)
}

fn target_of(direction: ConversionDirection) -> Target {
    match direction {
        ConversionDirection::CampariToGromacs => Target::Gromacs,
        ConversionDirection::GromacsToCampari => Target::Campari,
    }
}

fn file_name_of(input: &Path) -> Result<&std::ffi::OsStr> {
    input.file_name().ok_or_else(|| {
        CliError::Argument(format!("'{}' does not name a file", input.display()))
    })
}

/// Whether `output` resolves to the existing file `input`, whatever the spelling of either
/// path. The output may not exist yet, so only its parent directory is resolved.
fn same_file(input: &Path, output: &Path) -> bool {
    let Ok(input) = std::fs::canonicalize(input) else {
        return false;
    };
    let Some(name) = output.file_name() else {
        return false;
    };
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent)
        .map(|parent| parent.join(name) == input)
        .unwrap_or(false)
}

/// Pairs every input with the path its converted copy is written to.
///
/// Without `-o`, each output lands next to its input as `<stem>_<target>.pdb`. With a
/// single input, `-o` names the output file unless it is an existing directory. With
/// several inputs, `-o` is a directory that is created if needed.
fn plan_jobs(
    inputs: &[PathBuf],
    output: Option<&Path>,
    direction: ConversionDirection,
) -> Result<Vec<ConversionJob>> {
    let jobs = match output {
        None => inputs
            .iter()
            .map(|input| {
                let stem = input.file_stem().ok_or_else(|| {
                    CliError::Argument(format!("'{}' does not name a file", input.display()))
                })?;
                let name = format!(
                    "{}_{}.pdb",
                    stem.to_string_lossy(),
                    target_of(direction).file_suffix()
                );
                Ok(ConversionJob {
                    input: input.clone(),
                    output: input.with_file_name(name),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(path) if inputs.len() == 1 && !path.is_dir() => vec![ConversionJob {
            input: inputs[0].clone(),
            output: path.to_path_buf(),
        }],
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            inputs
                .iter()
                .map(|input| {
                    Ok(ConversionJob {
                        input: input.clone(),
                        output: dir.join(file_name_of(input)?),
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
    };

    let mut seen = HashSet::with_capacity(jobs.len());
    for job in &jobs {
        if job.output == job.input || same_file(&job.input, &job.output) {
            return Err(CliError::Argument(format!(
                "Output would overwrite input file '{}'",
                job.input.display()
            )));
        }
        if !seen.insert(&job.output) {
            return Err(CliError::Argument(format!(
                "Several inputs would be written to '{}'",
                job.output.display()
            )));
        }
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    const CAMPARI_PEPTIDE: &str = "\
REMARK capped alanine
ATOM 1 C ACE A 1 0.0 0.0 0.0 1.00 0.00
ATOM 2 O ACE A 1 0.0 0.0 1.0 1.00 0.00
ATOM 3 CH3 ACE A 1 0.0 1.0 0.0 1.00 0.00
ATOM 4 1H ACE A 1 0.0 1.0 1.0 1.00 0.00
ATOM 5 2H ACE A 1 1.0 1.0 0.0 1.00 0.00
ATOM 6 3H ACE A 1 1.0 0.0 1.0 1.00 0.00
ATOM 7 N ALA A 2 2.0 0.0 0.0 1.00 0.00
ATOM 8 CA ALA A 2 3.0 0.0 0.0 1.00 0.00
END
";

    fn convert_args(argv: &[&str]) -> ConvertArgs {
        let mut full = vec!["pdbshift", "convert"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Convert(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn default_outputs_sit_next_to_inputs() {
        let jobs = plan_jobs(
            &[PathBuf::from("data/run1.pdb")],
            None,
            ConversionDirection::GromacsToCampari,
        )
        .unwrap();
        assert_eq!(jobs[0].output, PathBuf::from("data/run1_campari.pdb"));
    }

    #[test]
    fn several_inputs_go_into_an_output_directory() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("converted");
        let inputs = [PathBuf::from("a/one.pdb"), PathBuf::from("b/two.pdb")];

        let jobs =
            plan_jobs(&inputs, Some(&out_dir), ConversionDirection::CampariToGromacs).unwrap();

        assert!(out_dir.is_dir());
        assert_eq!(jobs[0].output, out_dir.join("one.pdb"));
        assert_eq!(jobs[1].output, out_dir.join("two.pdb"));
    }

    #[test]
    fn clashing_outputs_are_rejected() {
        let dir = tempdir().unwrap();
        let inputs = [PathBuf::from("a/same.pdb"), PathBuf::from("b/same.pdb")];

        let result = plan_jobs(&inputs, Some(dir.path()), ConversionDirection::CampariToGromacs);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn output_equal_to_input_is_rejected() {
        let input = PathBuf::from("same.pdb");
        let result = plan_jobs(
            std::slice::from_ref(&input),
            Some(&input),
            ConversionDirection::CampariToGromacs,
        );
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn differently_spelled_path_to_the_input_is_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.pdb"), CAMPARI_PEPTIDE).unwrap();
        let input = dir.path().join("sub").join("..").join("a.pdb");

        let result = plan_jobs(
            std::slice::from_ref(&input),
            Some(dir.path()),
            ConversionDirection::CampariToGromacs,
        );
        assert!(matches!(result, Err(CliError::Argument(_))));
        assert_eq!(fs::read_to_string(dir.path().join("a.pdb")).unwrap(), CAMPARI_PEPTIDE);
    }

    #[test]
    #[serial]
    fn relative_input_into_current_directory_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.pdb"), CAMPARI_PEPTIDE).unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        let result = plan_jobs(
            &[PathBuf::from("a.pdb")],
            Some(Path::new(".")),
            ConversionDirection::CampariToGromacs,
        );
        std::env::set_current_dir(previous).unwrap();

        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_input_does_not_match_any_output() {
        let dir = tempdir().unwrap();
        assert!(!same_file(&dir.path().join("absent.pdb"), &dir.path().join("absent.pdb")));
        assert!(!same_file(Path::new("/"), Path::new("/")));
    }

    #[test]
    fn converts_a_file_end_to_end() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("peptide.pdb");
        let output = dir.path().join("peptide_gmx.pdb");
        fs::write(&input, CAMPARI_PEPTIDE).unwrap();

        let args = convert_args(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--to",
            "gromacs",
        ]);
        run(args).unwrap();

        let converted = PdbStructure::read(&output).unwrap();
        let cap = converted.chain("A").unwrap().residue(1).unwrap();
        let names: Vec<&str> = cap.iter().map(|a| a.atom_name()).collect();
        assert_eq!(names, ["CH3", "1HH3", "2HH3", "3HH3", "C", "O"]);
        assert_eq!(converted.header(), ["REMARK capped alanine"]);
        assert_eq!(converted.footer(), ["END"]);
        assert!(converted.atoms().all(|a| a.is_strict_format()));
    }

    #[test]
    fn failing_file_does_not_stop_the_others() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.pdb");
        let bad = dir.path().join("bad.pdb");
        fs::write(&good, CAMPARI_PEPTIDE).unwrap();
        fs::write(&bad, "ATOM 1 N ALA 1 1.0 2.0 3.0\n").unwrap();

        let args = convert_args(&[
            good.to_str().unwrap(),
            bad.to_str().unwrap(),
            "--to",
            "gromacs",
        ]);
        assert!(run(args).is_err());
        assert!(dir.path().join("good_gromacs.pdb").exists());
        assert!(!dir.path().join("bad_gromacs.pdb").exists());
    }

    #[test]
    fn conversion_errors_name_the_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("his.pdb");
        fs::write(&input, "ATOM 1 CA HIS A 4 0.0 0.0 0.0 1.00 0.00\n").unwrap();
        let config = ConversionConfig::new(ConversionDirection::GromacsToCampari);

        let err = convert_file(&input, &dir.path().join("out.pdb"), &config).unwrap_err();
        assert!(matches!(err, CliError::Conversion { ref path, .. } if *path == input));
        assert!(!dir.path().join("out.pdb").exists());
    }
}
