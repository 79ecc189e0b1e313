//! Provides input/output functionality for molecular file formats.
//!
//! The [`traits::MolecularFile`] trait is the seam between the structure model and a
//! concrete text format; [`pdb`] implements it for ATOM records in PDB files.

pub mod pdb;
pub mod traits;
