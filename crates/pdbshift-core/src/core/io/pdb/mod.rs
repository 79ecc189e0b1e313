//! Reading and writing of PDB text files.
//!
//! Only ATOM records are modeled. Lines before the first ATOM record are kept as a
//! verbatim header; non-ATOM lines after it form a verbatim footer; TER records are
//! dropped on read and re-emitted once per chain on write. The first line's terminator
//! (`\n` or `\r\n`) is reused for every line written back.

pub mod encoder;
pub mod error;
pub mod record;

use self::encoder::encode_atom;
use self::error::PdbError;
use self::record::parse_atom_line;
use crate::core::io::traits::MolecularFile;
use crate::core::models::builder::ChainBuilder;
use crate::core::models::structure::{LineEnding, PdbStructure};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

const ATOM_RECORD: &str = "ATOM";
const TER_RECORD: &str = "TER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Atom,
    Ter,
    Other,
}

impl LineKind {
    fn classify(line: &str) -> Self {
        match line.split_whitespace().next() {
            Some(token) if token.eq_ignore_ascii_case(ATOM_RECORD) => LineKind::Atom,
            Some(token) if token.eq_ignore_ascii_case(TER_RECORD) => LineKind::Ter,
            _ => LineKind::Other,
        }
    }
}

/// Splits a raw line from its terminator, if it has one.
fn split_terminator(raw: &str) -> (&str, Option<LineEnding>) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, Some(LineEnding::CrLf))
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, Some(LineEnding::Lf))
    } else {
        (raw, None)
    }
}

pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<PdbStructure, Self::Error> {
        let mut header = Vec::new();
        let mut footer = Vec::new();
        let mut builder = ChainBuilder::new();
        let mut in_body = false;
        let mut atom_lines = 0usize;
        let mut line_ending = None;
        let mut line_num = 0usize;
        let mut raw = String::new();

        loop {
            raw.clear();
            if reader.read_line(&mut raw)? == 0 {
                break;
            }
            line_num += 1;
            let (line, ending) = split_terminator(&raw);
            if line_ending.is_none() {
                line_ending = ending;
            }
            let line = line.to_string();

            match LineKind::classify(&line) {
                LineKind::Atom => {
                    in_body = true;
                    let atom = parse_atom_line(&line).map_err(|source| PdbError::Parse {
                        line: line_num,
                        source,
                    })?;
                    builder.push(atom);
                    atom_lines += 1;
                }
                LineKind::Ter if in_body => {}
                _ if in_body => footer.push(line),
                _ => header.push(line),
            }
        }

        let chains = builder.build()?;
        debug!(
            "Read {} ATOM records into {} chains ({} header lines, {} footer lines)",
            atom_lines,
            chains.len(),
            header.len(),
            footer.len()
        );
        Ok(PdbStructure::new(header, chains, footer)
            .with_line_ending(line_ending.unwrap_or_default()))
    }

    fn write_to(structure: &PdbStructure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut lines = Vec::with_capacity(
            structure.header().len() + structure.atom_count() + structure.len() + structure.footer().len(),
        );
        lines.extend(structure.header().iter().cloned());
        for (_, chain) in structure.chains() {
            for atom in chain.atoms() {
                lines.push(encode_atom(atom)?);
            }
            lines.push(TER_RECORD.to_string());
        }
        lines.extend(structure.footer().iter().cloned());

        let ending = structure.line_ending().as_str();
        for line in &lines {
            write!(writer, "{}{}", line, ending)?;
        }
        debug!("Wrote {} lines for {}", lines.len(), structure);
        Ok(())
    }
}

impl PdbStructure {
    /// Reads a PDB file from disk; see [`PdbFile::read_from_path`].
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, PdbError> {
        PdbFile::read_from_path(path)
    }

    /// Writes the structure to disk in the 80-column layout; see
    /// [`PdbFile::write_to_path`].
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PdbError> {
        PdbFile::write_to_path(self, path)
    }
}
