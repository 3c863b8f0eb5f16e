//! Residue-level data models shared by the structure readers.
//!
//! - [`ids`]: chain/number/insertion-code residue identifiers.
//! - [`amino_acid`]: amino-acid codes, including non-standard and HETATM-derived residues.
//! - [`residue`]: a residue's coordinates, frame, torsions and DSSP annotations.

pub mod amino_acid;
pub mod ids;
pub mod residue;
