use thiserror::Error;

use crate::core::geometry::{ErrorKind, GeometryError};
use crate::core::models::amino_acid::AminoAcid;
use crate::core::models::ids::ResidueId;
use crate::core::models::residue::ResidueError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("DSSP residue {dssp} does not match PDB residue {pdb}")]
    MismatchedIds { dssp: ResidueId, pdb: ResidueId },

    #[error("Residue {residue}: DSSP amino acid {dssp} does not match PDB amino acid {pdb}")]
    MismatchedAminoAcids {
        residue: ResidueId,
        dssp: AminoAcid,
        pdb: AminoAcid,
    },

    #[error("Invalid residue: {source}")]
    Residue {
        #[from]
        source: ResidueError,
    },

    #[error("Invalid geometry: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::MismatchedIds { .. } | ReconcileError::MismatchedAminoAcids { .. } => {
                ErrorKind::InvalidArgument
            }
            ReconcileError::Residue { source } => source.kind(),
            ReconcileError::Geometry { source } => source.kind(),
        }
    }
}
