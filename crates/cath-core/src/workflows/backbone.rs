use tracing::{debug, info, instrument};

use crate::core::geometry::coord::dihedral_angle_between_four_points;
use crate::core::geometry::{Angle, Coord, GeometryError, Rotation};
use crate::core::models::amino_acid::AminoAcid;
use crate::core::models::ids::ResidueId;
use crate::core::models::residue::{Residue, ResidueError, dssp_undefined_angle};
use crate::core::utils::frame::construct_residue_frame;
use crate::workflows::config::ReconcileConfig;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneAtoms {
    pub n: Coord,
    pub ca: Coord,
    pub c: Coord,
}

impl BackboneAtoms {
    pub fn new(n: Coord, ca: Coord, c: Coord) -> Self {
        Self { n, ca, c }
    }
}

/// A residue as read from the ATOM records of a structure file, before any derived geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneResidue {
    pub id: ResidueId,
    pub amino_acid: AminoAcid,
    pub atoms: BackboneAtoms,
    pub carbon_beta: Option<Coord>,
}

/// Computes the (phi, psi) torsions of every residue in a contiguous chain, in `[0°, 360°)`.
///
/// Phi needs the previous residue's C and psi the next residue's N, so the first
/// residue's phi and the last residue's psi are DSSP's undefined 360°. So is any
/// torsion whose four atoms do not define a dihedral.
#[instrument(skip_all, name = "torsion_angles_task", fields(residues = chain.len()))]
pub fn torsion_angles(chain: &[BackboneAtoms]) -> Vec<(Angle, Angle)> {
    #[cfg(not(feature = "parallel"))]
    let iterator = chain.iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = chain.par_iter().enumerate();

    iterator
        .map(|(index, atoms)| {
            let phi = index
                .checked_sub(1)
                .map(|prev| (&chain[prev].c, &atoms.n, &atoms.ca, &atoms.c));
            let psi = chain
                .get(index + 1)
                .map(|next| (&atoms.n, &atoms.ca, &atoms.c, &next.n));
            (
                torsion_or_undefined(index, "phi", phi),
                torsion_or_undefined(index, "psi", psi),
            )
        })
        .collect()
}

fn torsion_or_undefined(
    index: usize,
    torsion: &'static str,
    points: Option<(&Coord, &Coord, &Coord, &Coord)>,
) -> Angle {
    let Some((a, b, c, d)) = points else {
        return dssp_undefined_angle();
    };
    match dihedral_angle_between_four_points(a, b, c, d) {
        Ok(angle) => angle.shift_default(),
        Err(e) => {
            debug!(index, torsion, error = %e, "Degenerate backbone; torsion left undefined");
            dssp_undefined_angle()
        }
    }
}

/// Builds the reference frame of every residue in a chain.
///
/// # Errors
///
/// Fails with the first residue whose backbone atoms cannot define a frame.
#[instrument(skip_all, name = "residue_frames_task", fields(residues = chain.len()))]
pub fn residue_frames(chain: &[BackboneAtoms]) -> Result<Vec<Rotation>, GeometryError> {
    #[cfg(not(feature = "parallel"))]
    let iterator = chain.iter();

    #[cfg(feature = "parallel")]
    let iterator = chain.par_iter();

    iterator
        .map(|atoms| construct_residue_frame(&atoms.n, &atoms.ca, &atoms.c))
        .collect()
}

/// As [`residue_frames`], with every frame carrying `tolerance` for its own later checks.
pub fn residue_frames_with_tolerance(
    chain: &[BackboneAtoms],
    tolerance: f64,
) -> Result<Vec<Rotation>, GeometryError> {
    residue_frames(chain)?
        .into_iter()
        .map(|frame| {
            Rotation::from_slice_with_tolerance(frame.rows().as_flattened(), tolerance)
        })
        .collect()
}

/// Derives the full PDB-side residues of a chain: CA/CB positions, frames and torsions.
///
/// Residues without a CB (glycine) take their CA position. Frames carry the
/// configured rotation tolerance.
#[instrument(skip_all, name = "residues_from_backbone_task", fields(residues = chain.len()))]
pub fn residues_from_backbone(
    chain: &[BackboneResidue],
    config: &ReconcileConfig,
) -> Result<Vec<Residue>, ResidueError> {
    let atoms: Vec<BackboneAtoms> = chain.iter().map(|residue| residue.atoms).collect();
    let frames = residue_frames_with_tolerance(&atoms, config.rotation_tolerance())?;
    let torsions = torsion_angles(&atoms);

    let residues = chain
        .iter()
        .zip(frames)
        .zip(torsions)
        .map(|((residue, frame), (phi, psi))| {
            Residue::builder(residue.id, residue.amino_acid.clone())
                .carbon_alpha(residue.atoms.ca)
                .carbon_beta(residue.carbon_beta.unwrap_or(residue.atoms.ca))
                .frame(frame)
                .phi(phi)
                .psi(psi)
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(residues = residues.len(), "Derived residue geometry from backbone.");
    Ok(residues)
}
