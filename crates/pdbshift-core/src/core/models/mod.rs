//! # Core Models Module
//!
//! This module contains the in-memory hierarchy that a PDB file is decoded into:
//! structure → chains → residues → atoms.
//!
//! ## Overview
//!
//! The models are built once from a flat, ordered stream of atom records and then only
//! edited through a narrow mutation API:
//!
//! - **Rename a residue** - the new name reaches every atom of the residue
//! - **Rename an atom** - the first atom with the given name
//! - **Reorder atoms** - atoms move, serial numbers stay with their slots
//!
//! ## Key Components
//!
//! - [`atom`] - A single decoded ATOM record and the layout it was decoded from
//! - [`residue`] - A contiguous run of atoms sharing one residue id
//! - [`chain`] - Residue segmentation and chain-local numbering
//! - [`builder`] - Partitioning of an atom stream into chains, in first-appearance order
//! - [`structure`] - The file-level container with header and footer passthrough
//! - [`error`] - Lookup and structural errors raised by the hierarchy
//!
//! ## Usage
//!
//! ```ignore
//! use pdbshift::core::models::{atom::AtomRecord, builder::ChainBuilder, structure::PdbStructure};
//!
//! let chains = ChainBuilder::group(atoms)?;
//! let mut structure = PdbStructure::new(header, chains, footer);
//! structure.rename_residue("A", 1, "NAC")?;
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod error;
pub mod residue;
pub mod structure;
