//! # Core Module
//!
//! Stateless building blocks for protein-structure comparison.
//!
//! - **Geometry** ([`geometry`]) - Validated angles, 3D coordinates and rotation matrices
//! - **Molecular Representation** ([`models`]) - Residue identifiers, amino acids and residues
//! - **Utilities** ([`utils`]) - Per-residue reference frames built from backbone atoms
//!
//! Every type here is an immutable value once constructed. Constructors validate
//! their invariants and return a `Result`, so an invalid rotation or an out-of-range
//! torsion can never be observed by callers.

pub mod geometry;
pub mod models;
pub mod utils;
