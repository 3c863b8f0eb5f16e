use super::amino_acid::AminoAcid;
use super::ids::ResidueId;
use crate::core::geometry::{Angle, Coord, ErrorKind, GeometryError, Rotation};
use thiserror::Error;

/// Closeness (in degrees) within which a torsion counts as lying on a range boundary.
const TORSION_BOUNDARY_EPSILON_DEGREES: f64 = 1e-10;

/// The value DSSP writes for a torsion angle it cannot compute (e.g. at a chain break).
pub const DSSP_UNDEFINED_ANGLE_DEGREES: f64 = 360.0;

pub fn dssp_undefined_angle() -> Angle {
    Angle::one_revolution()
}

/// Whether `angle` is DSSP's undefined-torsion marker of 360°.
pub fn is_dssp_undefined_angle(angle: &Angle) -> bool {
    (angle.in_degrees() - DSSP_UNDEFINED_ANGLE_DEGREES).abs() < TORSION_BOUNDARY_EPSILON_DEGREES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecStrucType {
    Helix,
    Strand,
    #[default]
    Coil,
}

impl SecStrucType {
    /// Maps a DSSP secondary-structure summary character onto the three-state alphabet.
    pub fn from_dssp_label(label: char) -> Self {
        match label {
            'H' | 'G' | 'I' => SecStrucType::Helix,
            'E' | 'B' => SecStrucType::Strand,
            _ => SecStrucType::Coil,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Torsion {
    Phi,
    Psi,
}

impl std::fmt::Display for Torsion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Torsion::Phi => write!(f, "phi"),
            Torsion::Psi => write!(f, "psi"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResidueError {
    #[error("Residue {residue}: {torsion} angle of {degrees}° is outside [0°, 360°]")]
    TorsionOutOfRange {
        residue: ResidueId,
        torsion: Torsion,
        degrees: f64,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl ResidueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResidueError::TorsionOutOfRange { .. } => ErrorKind::InvalidArgument,
            ResidueError::Geometry(source) => source.kind(),
        }
    }
}

/// One residue of a protein chain, as described by a structure file.
///
/// The phi and psi torsions always lie in `[0°, 360°]`; the builder rejects
/// anything else. 360° is DSSP's marker for an undefined angle.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    id: ResidueId,
    amino_acid: AminoAcid,
    carbon_alpha: Coord,
    carbon_beta: Coord,
    sec_struc_number: usize,
    sec_struc_type: SecStrucType,
    frame: Rotation,
    phi: Angle,
    psi: Angle,
    access: usize,
}

impl Residue {
    pub fn builder(id: ResidueId, amino_acid: AminoAcid) -> ResidueBuilder {
        ResidueBuilder::new(id, amino_acid)
    }

    /// The placeholder DSSP reconciliation receives when DSSP has no record for a position.
    pub fn null() -> Self {
        Self {
            id: ResidueId::null(),
            amino_acid: AminoAcid::Unknown,
            carbon_alpha: Coord::ORIGIN,
            carbon_beta: Coord::ORIGIN,
            sec_struc_number: 0,
            sec_struc_type: SecStrucType::Coil,
            frame: Rotation::IDENTITY,
            phi: dssp_undefined_angle(),
            psi: dssp_undefined_angle(),
            access: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    pub fn id(&self) -> &ResidueId {
        &self.id
    }

    pub fn amino_acid(&self) -> &AminoAcid {
        &self.amino_acid
    }

    pub fn carbon_alpha(&self) -> &Coord {
        &self.carbon_alpha
    }

    pub fn carbon_beta(&self) -> &Coord {
        &self.carbon_beta
    }

    pub fn sec_struc_number(&self) -> usize {
        self.sec_struc_number
    }

    pub fn sec_struc_type(&self) -> SecStrucType {
        self.sec_struc_type
    }

    pub fn frame(&self) -> &Rotation {
        &self.frame
    }

    pub fn phi(&self) -> Angle {
        self.phi
    }

    pub fn psi(&self) -> Angle {
        self.psi
    }

    pub fn access(&self) -> usize {
        self.access
    }
}

/// Builds a [`Residue`], checking the torsion range on [`ResidueBuilder::build`].
///
/// Unset fields default to the origin for coordinates, the identity frame,
/// coil with number 0, zero accessibility and DSSP's undefined 360° torsions.
#[derive(Debug, Clone)]
pub struct ResidueBuilder {
    id: ResidueId,
    amino_acid: AminoAcid,
    carbon_alpha: Coord,
    carbon_beta: Coord,
    sec_struc_number: usize,
    sec_struc_type: SecStrucType,
    frame: Rotation,
    phi: Angle,
    psi: Angle,
    access: usize,
}

impl ResidueBuilder {
    pub fn new(id: ResidueId, amino_acid: AminoAcid) -> Self {
        Self {
            id,
            amino_acid,
            carbon_alpha: Coord::ORIGIN,
            carbon_beta: Coord::ORIGIN,
            sec_struc_number: 0,
            sec_struc_type: SecStrucType::Coil,
            frame: Rotation::IDENTITY,
            phi: dssp_undefined_angle(),
            psi: dssp_undefined_angle(),
            access: 0,
        }
    }

    pub fn carbon_alpha(mut self, coord: Coord) -> Self {
        self.carbon_alpha = coord;
        self
    }
    pub fn carbon_beta(mut self, coord: Coord) -> Self {
        self.carbon_beta = coord;
        self
    }
    pub fn sec_struc(mut self, number: usize, sec_struc_type: SecStrucType) -> Self {
        self.sec_struc_number = number;
        self.sec_struc_type = sec_struc_type;
        self
    }
    pub fn frame(mut self, frame: Rotation) -> Self {
        self.frame = frame;
        self
    }
    pub fn phi(mut self, phi: Angle) -> Self {
        self.phi = phi;
        self
    }
    pub fn psi(mut self, psi: Angle) -> Self {
        self.psi = psi;
        self
    }
    pub fn access(mut self, access: usize) -> Self {
        self.access = access;
        self
    }

    pub fn build(self) -> Result<Residue, ResidueError> {
        check_torsion_range(&self.id, Torsion::Phi, &self.phi)?;
        check_torsion_range(&self.id, Torsion::Psi, &self.psi)?;
        Ok(Residue {
            id: self.id,
            amino_acid: self.amino_acid,
            carbon_alpha: self.carbon_alpha,
            carbon_beta: self.carbon_beta,
            sec_struc_number: self.sec_struc_number,
            sec_struc_type: self.sec_struc_type,
            frame: self.frame,
            phi: self.phi,
            psi: self.psi,
            access: self.access,
        })
    }
}

fn check_torsion_range(
    residue: &ResidueId,
    torsion: Torsion,
    angle: &Angle,
) -> Result<(), ResidueError> {
    let degrees = angle.in_degrees();
    let lower = -TORSION_BOUNDARY_EPSILON_DEGREES;
    let upper = DSSP_UNDEFINED_ANGLE_DEGREES + TORSION_BOUNDARY_EPSILON_DEGREES;
    if !(lower..=upper).contains(&degrees) {
        return Err(ResidueError::TorsionOutOfRange {
            residue: *residue,
            torsion,
            degrees,
        });
    }
    Ok(())
}
