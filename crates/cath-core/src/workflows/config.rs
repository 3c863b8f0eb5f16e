use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::core::geometry::rotation::DEFAULT_ROTATION_TOLERANCE;

pub const DEFAULT_TORSION_TOLERANCE_DEGREES: f64 = 1.0;
pub const DEFAULT_CA_COORD_TOLERANCE: f64 = 0.05001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid value {value} for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Whether the DSSP run being reconciled broke torsions at chain breaks, writing 360°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DsspAngleSkipping {
    #[default]
    BreakAngles,
    DontBreakAngles,
}

/// Whether the PDB structure may contain residues that are not proper amino acids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidueMakeup {
    #[default]
    AllProper,
    SomeNonProper,
}

/// Tolerances and policies for reconciling DSSP residues with PDB residues.
///
/// Only [`ReconcileConfig::default`], [`ReconcileConfig::load`] and the builder
/// create one, and the latter two validate every value.
///
/// Any field missing from a TOML file takes its default:
///
/// ```toml
/// torsion_tolerance_degrees = 1.0
/// ca_coord_tolerance = 0.05001
/// rotation_tolerance = 1e-6
/// angle_skipping = "break_angles"
/// residue_makeup = "all_proper"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    pub(crate) torsion_tolerance_degrees: f64,
    pub(crate) ca_coord_tolerance: f64,
    pub(crate) rotation_tolerance: f64,
    pub(crate) angle_skipping: DsspAngleSkipping,
    pub(crate) residue_makeup: ResidueMakeup,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            torsion_tolerance_degrees: DEFAULT_TORSION_TOLERANCE_DEGREES,
            ca_coord_tolerance: DEFAULT_CA_COORD_TOLERANCE,
            rotation_tolerance: DEFAULT_ROTATION_TOLERANCE,
            angle_skipping: DsspAngleSkipping::default(),
            residue_makeup: ResidueMakeup::default(),
        }
    }
}

impl ReconcileConfig {
    pub fn builder() -> ReconcileConfigBuilder {
        ReconcileConfigBuilder::new()
    }

    pub fn torsion_tolerance_degrees(&self) -> f64 {
        self.torsion_tolerance_degrees
    }

    pub fn ca_coord_tolerance(&self) -> f64 {
        self.ca_coord_tolerance
    }

    /// Tolerance carried by the residue frames built from backbone atoms.
    pub fn rotation_tolerance(&self) -> f64 {
        self.rotation_tolerance
    }

    pub fn angle_skipping(&self) -> DsspAngleSkipping {
        self.angle_skipping
    }

    pub fn residue_makeup(&self) -> ResidueMakeup {
        self.residue_makeup
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=180.0).contains(&self.torsion_tolerance_degrees) {
            return Err(ConfigError::InvalidValue {
                parameter: "torsion_tolerance_degrees",
                value: self.torsion_tolerance_degrees,
                reason: "must lie within [0, 180]",
            });
        }
        if !(self.ca_coord_tolerance.is_finite() && self.ca_coord_tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "ca_coord_tolerance",
                value: self.ca_coord_tolerance,
                reason: "must be finite and non-negative",
            });
        }
        let rotation_tolerance = self.rotation_tolerance;
        if !(rotation_tolerance.is_normal() && (0.0..1.0).contains(&rotation_tolerance)) {
            return Err(ConfigError::InvalidValue {
                parameter: "rotation_tolerance",
                value: self.rotation_tolerance,
                reason: "must be a normal number within (0, 1)",
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ReconcileConfigBuilder {
    torsion_tolerance_degrees: Option<f64>,
    ca_coord_tolerance: Option<f64>,
    rotation_tolerance: Option<f64>,
    angle_skipping: Option<DsspAngleSkipping>,
    residue_makeup: Option<ResidueMakeup>,
}

impl ReconcileConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn torsion_tolerance_degrees(mut self, degrees: f64) -> Self {
        self.torsion_tolerance_degrees = Some(degrees);
        self
    }
    pub fn ca_coord_tolerance(mut self, tolerance: f64) -> Self {
        self.ca_coord_tolerance = Some(tolerance);
        self
    }
    pub fn rotation_tolerance(mut self, tolerance: f64) -> Self {
        self.rotation_tolerance = Some(tolerance);
        self
    }
    pub fn angle_skipping(mut self, skipping: DsspAngleSkipping) -> Self {
        self.angle_skipping = Some(skipping);
        self
    }
    pub fn residue_makeup(mut self, makeup: ResidueMakeup) -> Self {
        self.residue_makeup = Some(makeup);
        self
    }

    pub fn build(self) -> Result<ReconcileConfig, ConfigError> {
        let defaults = ReconcileConfig::default();
        let config = ReconcileConfig {
            torsion_tolerance_degrees: self
                .torsion_tolerance_degrees
                .unwrap_or(defaults.torsion_tolerance_degrees),
            ca_coord_tolerance: self
                .ca_coord_tolerance
                .unwrap_or(defaults.ca_coord_tolerance),
            rotation_tolerance: self
                .rotation_tolerance
                .unwrap_or(defaults.rotation_tolerance),
            angle_skipping: self.angle_skipping.unwrap_or(defaults.angle_skipping),
            residue_makeup: self.residue_makeup.unwrap_or(defaults.residue_makeup),
        };
        config.validate()?;
        Ok(config)
    }
}
