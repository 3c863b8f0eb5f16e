use thiserror::Error;

/// Broad classification of a geometry failure.
///
/// Callers that only care whether the input was bad, an index was wrong, or a
/// reconstruction could not be completed can match on this instead of on the
/// individual [`GeometryError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfRange,
    Runtime,
}

/// Which kind of matrix vector failed an orthogonality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixAxis {
    Row,
    Column,
}

impl std::fmt::Display for MatrixAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixAxis::Row => write!(f, "rows"),
            MatrixAxis::Column => write!(f, "columns"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Angle value {value} is not finite")]
    NonFiniteAngle { value: f64 },

    #[error("Tolerance {tolerance} must be a normal value strictly between 0 and 1")]
    InvalidTolerance { tolerance: f64 },

    #[error(
        "Rotation determinant {determinant} differs from 1.0 by more than the tolerance {tolerance}"
    )]
    DeterminantOutOfTolerance { determinant: f64, tolerance: f64 },

    #[error(
        "Rotation is not orthogonal: dot product of {axis} {first} and {second} is {computed}, expected {expected} (tolerance {tolerance})"
    )]
    NotOrthogonal {
        axis: MatrixAxis,
        first: usize,
        second: usize,
        computed: f64,
        expected: f64,
        tolerance: f64,
    },

    #[error("Rotation index ({row}, {col}) is out of range; both must be in 0..=2")]
    IndexOutOfRange { row: usize, col: usize },

    #[error("Cannot normalise a coordinate of length {length}")]
    ZeroLength { length: f64 },

    #[error("Vectors are parallel (cross product length {cross_length}); no unique plane exists")]
    ParallelVectors { cross_length: f64 },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Expected {expected} values to build a rotation but received {actual}")]
    WrongEntryCount { expected: usize, actual: usize },

    #[error(
        "Unable to tidy rotation: entry ({row}, {col}) was {original} but the rebuilt value is {tidied} (tolerance {tolerance})"
    )]
    TidyRotationFailed {
        row: usize,
        col: usize,
        original: f64,
        tidied: f64,
        tolerance: f64,
    },
}

impl GeometryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeometryError::NonFiniteAngle { .. }
            | GeometryError::InvalidTolerance { .. }
            | GeometryError::DeterminantOutOfTolerance { .. }
            | GeometryError::NotOrthogonal { .. }
            | GeometryError::ParallelVectors { .. }
            | GeometryError::DegenerateGeometry(_) => ErrorKind::InvalidArgument,
            GeometryError::IndexOutOfRange { .. } | GeometryError::ZeroLength { .. } => {
                ErrorKind::OutOfRange
            }
            GeometryError::WrongEntryCount { .. } | GeometryError::TidyRotationFailed { .. } => {
                ErrorKind::Runtime
            }
        }
    }
}
