use tracing::{debug, info, warn};

use super::config::{DsspAngleSkipping, ReconcileConfig, ResidueMakeup};
use super::error::ReconcileError;
use crate::core::geometry::Angle;
use crate::core::geometry::angle::wrapped_difference;
use crate::core::models::residue::{Residue, Torsion, is_dssp_undefined_angle};

/// Combines a residue read from a DSSP file with the same residue computed from a PDB file.
///
/// Uses the default tolerances; see [`combine_residues_with_config`].
pub fn combine_residues_from_dssp_and_pdb(
    dssp: &Residue,
    pdb: &Residue,
    angle_skipping: DsspAngleSkipping,
    makeup: ResidueMakeup,
) -> Result<Residue, ReconcileError> {
    let config = ReconcileConfig {
        angle_skipping,
        residue_makeup: makeup,
        ..ReconcileConfig::default()
    };
    combine_residues_with_config(dssp, pdb, &config)
}

/// Combines a DSSP residue with its PDB counterpart.
///
/// The result takes accessibility and secondary structure from DSSP and everything
/// else from PDB. Disagreements in torsions or CA position beyond the configured
/// tolerances are logged and never fatal. A null DSSP residue (DSSP had no record
/// for this position) is accepted without any cross-checks.
///
/// # Errors
///
/// Returns [`ReconcileError::MismatchedIds`] or [`ReconcileError::MismatchedAminoAcids`]
/// when a non-null DSSP residue describes a different residue from the PDB one.
pub fn combine_residues_with_config(
    dssp: &Residue,
    pdb: &Residue,
    config: &ReconcileConfig,
) -> Result<Residue, ReconcileError> {
    if dssp.is_null() {
        debug!(residue = %pdb.id(), "No DSSP record; using PDB residue without cross-checks");
    } else {
        if dssp.id() != pdb.id() {
            return Err(ReconcileError::MismatchedIds {
                dssp: *dssp.id(),
                pdb: *pdb.id(),
            });
        }
        check_amino_acids(dssp, pdb, config.residue_makeup())?;
        check_torsion(pdb, Torsion::Phi, dssp.phi(), pdb.phi(), config);
        check_torsion(pdb, Torsion::Psi, dssp.psi(), pdb.psi(), config);
        check_carbon_alpha(dssp, pdb, config.ca_coord_tolerance());
    }

    let merged = Residue::builder(*pdb.id(), pdb.amino_acid().clone())
        .carbon_alpha(*pdb.carbon_alpha())
        .carbon_beta(*pdb.carbon_beta())
        .sec_struc(dssp.sec_struc_number(), dssp.sec_struc_type())
        .frame(*pdb.frame())
        .phi(pdb.phi())
        .psi(pdb.psi())
        .access(dssp.access())
        .build()?;
    Ok(merged)
}

fn check_amino_acids(
    dssp: &Residue,
    pdb: &Residue,
    makeup: ResidueMakeup,
) -> Result<(), ReconcileError> {
    let (dssp_aa, pdb_aa) = (dssp.amino_acid(), pdb.amino_acid());
    if dssp_aa == pdb_aa {
        return Ok(());
    }

    if dssp_aa.is_unknown() && pdb_aa.is_non_standard_variant() {
        info!(
            residue = %pdb.id(),
            pdb_amino_acid = %pdb_aa,
            "DSSP reports an unknown amino acid where PDB has a non-standard variant; using PDB's"
        );
        return Ok(());
    }
    if dssp_aa.is_unknown() && !pdb_aa.is_proper() {
        debug!(
            residue = %pdb.id(),
            pdb_amino_acid = %pdb_aa,
            "DSSP reports an unknown amino acid where PDB has a HETATM residue; using PDB's"
        );
        return Ok(());
    }
    if makeup == ResidueMakeup::SomeNonProper && !pdb_aa.is_proper() {
        debug!(
            residue = %pdb.id(),
            dssp_amino_acid = %dssp_aa,
            pdb_amino_acid = %pdb_aa,
            "Amino acid mismatch on a non-proper PDB residue; using PDB's"
        );
        return Ok(());
    }

    Err(ReconcileError::MismatchedAminoAcids {
        residue: *pdb.id(),
        dssp: dssp_aa.clone(),
        pdb: pdb_aa.clone(),
    })
}

fn check_torsion(
    pdb: &Residue,
    torsion: Torsion,
    dssp_angle: Angle,
    pdb_angle: Angle,
    config: &ReconcileConfig,
) {
    let difference = wrapped_difference(dssp_angle, pdb_angle).in_degrees();
    if difference <= config.torsion_tolerance_degrees() {
        return;
    }

    let broken_by_dssp = config.angle_skipping() == DsspAngleSkipping::BreakAngles;
    if broken_by_dssp && is_dssp_undefined_angle(&dssp_angle) {
        info!(
            residue = %pdb.id(),
            %torsion,
            pdb_degrees = pdb_angle.in_degrees(),
            "DSSP left the torsion undefined at a chain break"
        );
    } else {
        warn!(
            residue = %pdb.id(),
            %torsion,
            dssp_degrees = dssp_angle.in_degrees(),
            pdb_degrees = pdb_angle.in_degrees(),
            difference_degrees = difference,
            "DSSP and PDB torsions disagree"
        );
    }
}

fn check_carbon_alpha(dssp: &Residue, pdb: &Residue, tolerance: f64) {
    let (dssp_ca, pdb_ca) = (dssp.carbon_alpha(), pdb.carbon_alpha());
    let components = [
        ("x", dssp_ca.x(), pdb_ca.x()),
        ("y", dssp_ca.y(), pdb_ca.y()),
        ("z", dssp_ca.z(), pdb_ca.z()),
    ];
    for (axis, dssp_value, pdb_value) in components {
        if (dssp_value - pdb_value).abs() > tolerance {
            warn!(
                residue = %pdb.id(),
                axis,
                dssp_value,
                pdb_value,
                "DSSP and PDB carbon-alpha coordinates disagree"
            );
        }
    }
}
