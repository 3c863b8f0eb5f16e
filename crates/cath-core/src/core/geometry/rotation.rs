use super::angle::Angle;
use super::coord::{Coord, cross_product, length, normalise_copy, rotate_copy};
use super::error::{GeometryError, MatrixAxis};
use nalgebra::{Matrix3, Rotation3};
use std::fmt;
use std::ops::{Mul, MulAssign};

pub const DEFAULT_ROTATION_TOLERANCE: f64 = 1e-6;

const ENTRY_COUNT: usize = 9;

/// A proper 3x3 rotation matrix.
///
/// Every constructor checks that the matrix is orthogonal and has a
/// determinant of 1.0, both to within the rotation's tolerance, so an invalid
/// `Rotation` cannot be built. Entries are addressed row-major. Applying a
/// rotation to a [`Coord`] yields the dot products of the rows with that
/// coordinate.
///
/// Because a valid rotation is orthogonal, [`transpose_copy`] doubles as the
/// inverse; this is relied upon rather than re-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    matrix: Matrix3<f64>,
    tolerance: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation::from_trusted_rows([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);

    /// Sends x to y, y to z and z to x.
    pub const X_TO_Y_TO_Z_TO_X: Rotation = Rotation::from_trusted_rows([
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
    ]);

    /// Sends x to z, z to y and y to x; the inverse of [`Rotation::X_TO_Y_TO_Z_TO_X`].
    pub const X_TO_Z_TO_Y_TO_X: Rotation = Rotation::from_trusted_rows([
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
    ]);

    const fn from_trusted_rows(rows: [[f64; 3]; 3]) -> Self {
        Self {
            matrix: Matrix3::new(
                rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2],
                rows[2][0], rows[2][1], rows[2][2],
            ),
            tolerance: DEFAULT_ROTATION_TOLERANCE,
        }
    }

    /// Builds a rotation from nine row-major values with the default tolerance.
    pub fn new(values: [f64; 9]) -> Result<Self, GeometryError> {
        Self::with_tolerance(values, DEFAULT_ROTATION_TOLERANCE)
    }

    /// Builds a rotation from nine row-major values.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is not a normal value in `(0, 1)`, if the
    /// determinant differs from 1.0 by more than `tolerance`, or if any pair of
    /// rows or columns fails the orthonormality check.
    pub fn with_tolerance(values: [f64; 9], tolerance: f64) -> Result<Self, GeometryError> {
        let matrix = Matrix3::from_row_slice(&values);
        check_rotation(&matrix, tolerance)?;
        Ok(Self { matrix, tolerance })
    }

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self, GeometryError> {
        let [r0, r1, r2] = rows;
        Self::new([
            r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2],
        ])
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, GeometryError> {
        Self::from_slice_with_tolerance(values, DEFAULT_ROTATION_TOLERANCE)
    }

    pub fn from_slice_with_tolerance(
        values: &[f64],
        tolerance: f64,
    ) -> Result<Self, GeometryError> {
        let values: [f64; ENTRY_COUNT] =
            values.try_into().map_err(|_| GeometryError::WrongEntryCount {
                expected: ENTRY_COUNT,
                actual: values.len(),
            })?;
        Self::with_tolerance(values, tolerance)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn value(&self, row: usize, col: usize) -> Result<f64, GeometryError> {
        if row > 2 || col > 2 {
            return Err(GeometryError::IndexOutOfRange { row, col });
        }
        Ok(self.matrix[(row, col)])
    }

    /// Compile-time indexed access; out-of-range indices fail to build.
    pub fn value_at<const ROW: usize, const COL: usize>(&self) -> f64 {
        const { assert!(ROW < 3 && COL < 3, "rotation indices must be in 0..=2") };
        self.matrix[(ROW, COL)]
    }

    pub fn row(&self, row: usize) -> Result<Coord, GeometryError> {
        if row > 2 {
            return Err(GeometryError::IndexOutOfRange { row, col: 0 });
        }
        Ok(Coord::new(
            self.matrix[(row, 0)],
            self.matrix[(row, 1)],
            self.matrix[(row, 2)],
        ))
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    /// Whether every entry is within `tolerance` of the corresponding entry of `other`.
    pub fn is_close_to(&self, other: &Rotation, tolerance: f64) -> bool {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

fn check_rotation(matrix: &Matrix3<f64>, tolerance: f64) -> Result<(), GeometryError> {
    if !tolerance.is_normal() || tolerance <= 0.0 || tolerance >= 1.0 {
        return Err(GeometryError::InvalidTolerance { tolerance });
    }

    let det = matrix_determinant(matrix);
    if !((det - 1.0).abs() <= tolerance) {
        return Err(GeometryError::DeterminantOutOfTolerance {
            determinant: det,
            tolerance,
        });
    }

    for first in 0..3 {
        for second in first..3 {
            let expected = if first == second { 1.0 } else { 0.0 };

            let row_dot = matrix.row(first).dot(&matrix.row(second));
            if !((row_dot - expected).abs() <= tolerance) {
                return Err(GeometryError::NotOrthogonal {
                    axis: MatrixAxis::Row,
                    first,
                    second,
                    computed: row_dot,
                    expected,
                    tolerance,
                });
            }

            let column_dot = matrix.column(first).dot(&matrix.column(second));
            if !((column_dot - expected).abs() <= tolerance) {
                return Err(GeometryError::NotOrthogonal {
                    axis: MatrixAxis::Column,
                    first,
                    second,
                    computed: column_dot,
                    expected,
                    tolerance,
                });
            }
        }
    }
    Ok(())
}

fn matrix_determinant(m: &Matrix3<f64>) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

impl MulAssign for Rotation {
    /// `a *= b` leaves `a` as `a * b`: applied to a coordinate, `b` acts first.
    fn mul_assign(&mut self, rhs: Rotation) {
        self.matrix *= rhs.matrix;
        self.tolerance = self.tolerance.max(rhs.tolerance);
    }
}

impl Mul for Rotation {
    type Output = Rotation;
    fn mul(mut self, rhs: Rotation) -> Rotation {
        self *= rhs;
        self
    }
}

impl Mul<Coord> for Rotation {
    type Output = Coord;
    fn mul(self, rhs: Coord) -> Coord {
        rotate_copy(&self, &rhs)
    }
}

impl Mul<Coord> for &Rotation {
    type Output = Coord;
    fn mul(self, rhs: Coord) -> Coord {
        rotate_copy(self, &rhs)
    }
}

impl TryFrom<&Rotation3<f64>> for Rotation {
    type Error = GeometryError;
    fn try_from(rotation: &Rotation3<f64>) -> Result<Self, Self::Error> {
        let matrix = *rotation.matrix();
        check_rotation(&matrix, DEFAULT_ROTATION_TOLERANCE)?;
        Ok(Self {
            matrix,
            tolerance: DEFAULT_ROTATION_TOLERANCE,
        })
    }
}

impl From<Rotation> for Rotation3<f64> {
    fn from(rotation: Rotation) -> Self {
        Rotation3::from_matrix_unchecked(rotation.matrix)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r0, r1, r2] = self.rows();
        write!(
            f,
            "[[{}, {}, {}], [{}, {}, {}], [{}, {}, {}]]",
            r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2]
        )
    }
}

pub fn transpose_copy(rotation: &Rotation) -> Rotation {
    Rotation {
        matrix: rotation.matrix.transpose(),
        tolerance: rotation.tolerance,
    }
}

/// The rotation that, applied after `first`, yields `second`.
pub fn rotation_between_rotations(first: &Rotation, second: &Rotation) -> Rotation {
    *second * transpose_copy(first)
}

pub fn trace(rotation: &Rotation) -> f64 {
    rotation.matrix.trace()
}

pub fn determinant(rotation: &Rotation) -> f64 {
    matrix_determinant(&rotation.matrix)
}

/// The magnitude of the rotation about its axis, in `[0, π]`.
pub fn angle_of_rotation(rotation: &Rotation) -> Angle {
    let cosine = ((trace(rotation) - 1.0) / 2.0).clamp(-1.0, 1.0);
    Angle::from_finite_radians(cosine.acos())
}

pub fn angle_between_rotations(first: &Rotation, second: &Rotation) -> Angle {
    angle_of_rotation(&rotation_between_rotations(first, second))
}

/// The rotation that sends `a` onto the positive x-axis and places `b` in the
/// x-y half-plane with positive y.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroLength`] if `a` has no usable length and
/// [`GeometryError::ParallelVectors`] if `a` and `b` do not span a plane.
pub fn rotation_to_x_axis_and_x_y_plane(a: &Coord, b: &Coord) -> Result<Rotation, GeometryError> {
    let unit_a = normalise_copy(a)?;
    let normal = cross_product(&unit_a, b);
    let cross_length = length(&normal);
    if !cross_length.is_normal() {
        return Err(GeometryError::ParallelVectors { cross_length });
    }
    let unit_normal = normal / cross_length;
    let unit_b_perp = normalise_copy(&cross_product(&unit_normal, &unit_a))?;

    Rotation::from_rows([
        unit_a.to_array(),
        unit_b_perp.to_array(),
        unit_normal.to_array(),
    ])
}

/// Rebuilds a clean rotation from values that are only approximately
/// orthonormal (e.g. read from a file with limited decimal places).
///
/// The rotation is reconstructed from the first two rows and then every one of
/// the nine rebuilt entries must lie within `tolerance` of the supplied value.
pub fn tidy_rotation(values: [f64; 9], tolerance: f64) -> Result<Rotation, GeometryError> {
    let first_row = Coord::new(values[0], values[1], values[2]);
    let second_row = Coord::new(values[3], values[4], values[5]);
    let tidied = rotation_to_x_axis_and_x_y_plane(&first_row, &second_row)?;

    for row in 0..3 {
        for col in 0..3 {
            let original = values[row * 3 + col];
            let rebuilt = tidied.matrix[(row, col)];
            if !((rebuilt - original).abs() <= tolerance) {
                return Err(GeometryError::TidyRotationFailed {
                    row,
                    col,
                    original,
                    tidied: rebuilt,
                    tolerance,
                });
            }
        }
    }
    Ok(tidied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::ErrorKind;
    use nalgebra::{Unit, Vector3};

    fn sample_rotation() -> Rotation {
        let axis = Unit::new_normalize(Vector3::new(1.0, -2.0, 0.5));
        Rotation::try_from(&Rotation3::from_axis_angle(&axis, 1.234)).unwrap()
    }

    #[test]
    fn identity_and_permutations_are_valid_rotations() {
        for rotation in [
            Rotation::IDENTITY,
            Rotation::X_TO_Y_TO_Z_TO_X,
            Rotation::X_TO_Z_TO_Y_TO_X,
        ] {
            let rows = rotation.rows();
            assert!(Rotation::from_rows(rows).is_ok());
            assert_eq!(determinant(&rotation), 1.0);
        }
        assert_eq!(
            Rotation::X_TO_Y_TO_Z_TO_X * Rotation::X_TO_Z_TO_Y_TO_X,
            Rotation::IDENTITY
        );
    }

    #[test]
    fn all_zero_matrix_is_rejected() {
        let result = Rotation::new([0.0; 9]);
        assert!(matches!(
            result,
            Err(GeometryError::DeterminantOutOfTolerance { .. })
        ));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn reflection_is_rejected_by_determinant_check() {
        let result = Rotation::new([-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(matches!(
            result,
            Err(GeometryError::DeterminantOutOfTolerance { determinant, .. }) if determinant == -1.0
        ));
    }

    #[test]
    fn shear_with_unit_determinant_is_rejected_by_orthogonality_check() {
        let result = Rotation::new([1.0, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert!(matches!(
            result,
            Err(GeometryError::NotOrthogonal {
                axis: MatrixAxis::Row,
                first: 0,
                second: 0,
                ..
            })
        ));
    }

    #[test]
    fn non_finite_entries_are_rejected() {
        let mut values = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        values[4] = f64::NAN;
        assert!(Rotation::new(values).is_err());
    }

    #[test]
    fn tolerance_must_be_normal_and_below_one() {
        let identity = Rotation::IDENTITY.rows();
        let flat: Vec<f64> = identity.iter().flatten().copied().collect();
        for tolerance in [0.0, -1e-3, 1.0, 2.0, f64::NAN, f64::MIN_POSITIVE / 2.0] {
            assert!(matches!(
                Rotation::from_slice_with_tolerance(&flat, tolerance),
                Err(GeometryError::InvalidTolerance { .. })
            ));
        }
        let loose = Rotation::from_slice_with_tolerance(&flat, 0.1).unwrap();
        assert_eq!(loose.tolerance(), 0.1);
    }

    #[test]
    fn slice_with_wrong_entry_count_is_rejected() {
        let result = Rotation::from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            result,
            Err(GeometryError::WrongEntryCount {
                expected: 9,
                actual: 8
            })
        );
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Runtime);
    }

    #[test]
    fn value_access_is_bounds_checked() {
        let rotation = Rotation::X_TO_Y_TO_Z_TO_X;
        assert_eq!(rotation.value(0, 2), Ok(1.0));
        assert_eq!(rotation.value_at::<1, 0>(), 1.0);
        let err = rotation.value(3, 0).unwrap_err();
        assert_eq!(err, GeometryError::IndexOutOfRange { row: 3, col: 0 });
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(rotation.value(0, 3).is_err());
        assert!(rotation.row(3).is_err());
    }

    #[test]
    fn transpose_is_the_inverse() {
        let rotation = sample_rotation();
        let product = transpose_copy(&rotation) * rotation;
        assert!(product.is_close_to(&Rotation::IDENTITY, 1e-12));
        assert!((determinant(&rotation) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_between_identical_rotations_is_identity() {
        let rotation = sample_rotation();
        let between = rotation_between_rotations(&rotation, &rotation);
        assert!(between.is_close_to(&Rotation::IDENTITY, 1e-12));
        assert!(angle_between_rotations(&rotation, &rotation).in_radians() < 1e-6);
    }

    #[test]
    fn rotation_between_rotations_composes_back_to_second() {
        let first = sample_rotation();
        let second = Rotation::X_TO_Y_TO_Z_TO_X;
        let between = rotation_between_rotations(&first, &second);
        assert!((between * first).is_close_to(&second, 1e-12));
    }

    #[test]
    fn angle_of_rotation_matches_axis_angle() {
        assert_eq!(angle_of_rotation(&Rotation::IDENTITY).in_radians(), 0.0);
        assert!((angle_of_rotation(&sample_rotation()).in_radians() - 1.234).abs() < 1e-9);
        assert!(
            (angle_of_rotation(&Rotation::X_TO_Y_TO_Z_TO_X).in_degrees() - 120.0).abs() < 1e-9
        );
        assert_eq!(trace(&Rotation::IDENTITY), 3.0);
    }

    #[test]
    fn composition_is_ordered() {
        let quarter_about_z =
            Rotation::new([0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let quarter_about_x =
            Rotation::new([1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0]).unwrap();

        let z_then_x = quarter_about_x * quarter_about_z;
        let x_then_z = quarter_about_z * quarter_about_x;
        assert!(!z_then_x.is_close_to(&x_then_z, 1e-6));

        // X goes to Y under z, then Y goes to Z under x.
        assert_eq!(z_then_x * Coord::UNIT_X, Coord::UNIT_Z);

        let mut accumulated = quarter_about_x;
        accumulated *= quarter_about_z;
        assert_eq!(accumulated, z_then_x);
    }

    #[test]
    fn x_axis_and_plane_rotation_places_inputs() {
        let a = Coord::new(1.0, 2.0, 3.0);
        let b = Coord::new(-2.0, 0.5, 1.0);
        let rotation = rotation_to_x_axis_and_x_y_plane(&a, &b).unwrap();

        let rotated_a = &rotation * a;
        assert_eq!(rotated_a, Coord::new(length(&a), 0.0, 0.0));

        let rotated_b = &rotation * b;
        assert!(rotated_b.y() > 0.0);
        assert!(rotated_b.z().abs() < 1e-12);
    }

    #[test]
    fn x_axis_and_plane_rotation_rejects_degenerate_inputs() {
        assert!(matches!(
            rotation_to_x_axis_and_x_y_plane(&Coord::ORIGIN, &Coord::UNIT_Y),
            Err(GeometryError::ZeroLength { .. })
        ));
        assert!(matches!(
            rotation_to_x_axis_and_x_y_plane(&Coord::UNIT_X, &(-4.0 * Coord::UNIT_X)),
            Err(GeometryError::ParallelVectors { .. })
        ));
        assert!(matches!(
            rotation_to_x_axis_and_x_y_plane(&Coord::UNIT_X, &Coord::ORIGIN),
            Err(GeometryError::ParallelVectors { .. })
        ));
    }

    #[test]
    fn tidy_rotation_recovers_rounded_values() {
        let rounded: Vec<f64> = sample_rotation()
            .rows()
            .iter()
            .flatten()
            .map(|v| (v * 1e4).round() / 1e4)
            .collect();
        let values: [f64; 9] = rounded.as_slice().try_into().unwrap();

        let tidied = tidy_rotation(values, 1e-3).unwrap();
        assert!(tidied.is_close_to(&sample_rotation(), 1e-3));
    }

    #[test]
    fn tidy_rotation_reports_the_offending_entry() {
        let values = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.9];
        let err = tidy_rotation(values, 1e-3).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::TidyRotationFailed { row: 2, col: 2, .. }
        ));
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn converts_to_nalgebra_rotation() {
        let rotation = sample_rotation();
        let converted: Rotation3<f64> = rotation.into();
        let v = Vector3::new(0.3, -1.0, 2.0);
        let expected = rotation * Coord::from(v);
        assert_eq!(Coord::from(converted * v), expected);
    }
}
