//! # pdbshift Core Library
//!
//! Reads protein structures from PDB files, exposes them as chains of residues that can be
//! renamed and reordered, and writes them back as strict fixed-column PDB text.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** The owned structure model (`PdbStructure`, `Chain`,
//!   `Residue`, `AtomRecord`) with its mutation API, and the PDB codec that tolerantly
//!   decodes ATOM lines and re-encodes them with explicit column widths.
//!
//! - **[`workflows`]: The Public API.** Multi-step procedures built only on the model's
//!   public mutation API, such as converting residue and atom naming between the CAMPARI
//!   and GROMACS conventions.

pub mod core;
pub mod workflows;
