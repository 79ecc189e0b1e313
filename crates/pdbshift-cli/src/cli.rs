use clap::{Args, Parser, Subcommand, ValueEnum};
use pdbshift::workflows::config::ConversionDirection;
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "pdbshift - Read, normalize and convert the ATOM records of PDB files between CAMPARI and GROMACS naming.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output; a failing command still prints its error on exit
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process several files at once.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert residue and atom naming between the CAMPARI and GROMACS conventions.
    Convert(ConvertArgs),
    /// Rewrite a PDB file with every ATOM record in strict 80-column format.
    Normalize(NormalizeArgs),
    /// Print a chain and residue summary of a PDB file.
    Info(InfoArgs),
}

/// The naming convention to convert into.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// CAMPARI input, GROMACS output.
    Gromacs,
    /// GROMACS input, CAMPARI output.
    Campari,
}

impl Target {
    pub fn file_suffix(self) -> &'static str {
        match self {
            Target::Gromacs => "gromacs",
            Target::Campari => "campari",
        }
    }
}

impl From<Target> for ConversionDirection {
    fn from(target: Target) -> Self {
        match target {
            Target::Gromacs => ConversionDirection::CampariToGromacs,
            Target::Campari => ConversionDirection::GromacsToCampari,
        }
    }
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// One or more input PDB files.
    #[arg(required = true, num_args = 1.., value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output file for a single input, or output directory for several.
    /// Defaults to `<stem>_<target>.pdb` next to each input.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// The naming convention to convert into, overriding the config file.
    #[arg(short, long, value_enum, value_name = "TARGET")]
    pub to: Option<Target>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override `convert.cap-change` from the config file.
    #[command(flatten)]
    pub cap_change: CapChange,
}

/// A group to handle mutually exclusive boolean flags for terminal cap rewriting.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct CapChange {
    /// Force reordering and renaming of ACE/NME/NAC terminal caps.
    #[arg(long)]
    pub cap_change: bool,
    /// Leave terminal caps untouched.
    #[arg(long)]
    pub no_cap_change: bool,
}

impl CapChange {
    pub fn resolve(self) -> Option<bool> {
        match (self.cap_change, self.no_cap_change) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the `normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Path to the input PDB file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the normalized output file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the input PDB file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// List every residue of every chain.
    #[arg(short, long)]
    pub residues: bool,
}
