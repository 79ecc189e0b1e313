//! # Core Module
//!
//! The structure model and its file boundary.
//!
//! - **Structure Model** ([`models`]) - Atom records, residues, chains and whole structures,
//!   plus the grouping of a flat ATOM stream into chains of residues.
//! - **File I/O** ([`io`]) - Decoding and encoding of PDB ATOM records behind the
//!   [`io::traits::MolecularFile`] interface.

pub mod io;
pub mod models;
