//! # CATH Core Library
//!
//! The 3D rigid-body geometry kernel of the CATH protein-structure comparison tools.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Validated value types (`Angle`, `Coord`, `Rotation`),
//!   residue models and residue-frame construction. Everything here is pure computation.
//!
//! - **[`workflows`]: The Public API.** Procedures built on `core`: reconciling the
//!   residues a DSSP file describes with those computed from a PDB file, and deriving
//!   torsions and frames for whole backbone chains. Tolerances come from a
//!   [`workflows::config::ReconcileConfig`], loadable from TOML.
//!
//! The library reports through `tracing` and never installs a subscriber itself.

pub mod core;
pub mod workflows;
