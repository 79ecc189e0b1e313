use crate::core::models::structure::PdbStructure;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Defines the interface for reading and writing a molecular text format.
///
/// Implementors handle format-specific decoding and encoding against buffered readers
/// and writers; the path-based helpers scope the file handle to a single call.
pub trait MolecularFile {
    /// The error type for I/O and format operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be decoded or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<PdbStructure, Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded or the writer fails.
    fn write_to(structure: &PdbStructure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoding fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<PdbStructure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a structure to a file path.
    ///
    /// The output is rendered in memory first, so the file is only created once every
    /// record has been encoded successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the file cannot be written.
    fn write_to_path<P: AsRef<Path>>(
        structure: &PdbStructure,
        path: P,
    ) -> Result<(), Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(structure, &mut buffer)?;
        fs::write(path, buffer)?;
        Ok(())
    }
}
