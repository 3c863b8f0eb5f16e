//! # Workflows Module
//!
//! Procedures that tie the `core` value types together.
//!
//! - **Reconciliation** ([`reconcile`]) - Merges each residue a DSSP file describes with
//!   the same residue computed from a PDB file, cross-checking torsions and CA positions.
//! - **Backbone Processing** ([`backbone`]) - Torsions, frames and residues for whole chains.
//! - **Configuration** ([`config`]) - Tolerances and policies, loadable from TOML.

pub mod backbone;
pub mod config;
pub mod error;
pub mod reconcile;
