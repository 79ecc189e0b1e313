//! # Workflows Module
//!
//! High-level procedures built on the structure model's public mutation API.
//!
//! - **Conversion** ([`convert`]) - Renames and reorders residues and atoms between the
//!   CAMPARI and GROMACS naming conventions.
//! - **Configuration** ([`config`]) - Conversion direction and options, assembled through
//!   a builder.

pub mod config;
pub mod convert;
