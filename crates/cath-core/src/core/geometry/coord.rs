use super::angle::Angle;
use super::error::GeometryError;
use super::rotation::Rotation;
use nalgebra::{Point3, Vector3};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Squared separation below which two coordinates compare as equal.
const COORD_EQUALITY_TOLERANCE_SQUARED: f64 = 1e-5 * 1e-5;

/// A point or displacement in 3D space, in Angstroms.
///
/// `Coord` is a plain value: no finiteness check is made on construction, and
/// functions that need a non-degenerate vector (e.g. [`normalise_copy`]) check
/// for themselves.
///
/// Equality is tolerance-based: two coordinates are equal when the squared
/// distance between them is below `(1e-5)²`. This is why `Coord` implements
/// neither `Eq` nor `Hash`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coord {
    vector: Vector3<f64>,
}

impl Coord {
    pub const ORIGIN: Coord = Coord::new(0.0, 0.0, 0.0);
    pub const UNIT_X: Coord = Coord::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Coord = Coord::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Coord = Coord::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            vector: Vector3::new(x, y, z),
        }
    }

    pub fn x(&self) -> f64 {
        self.vector.x
    }

    pub fn y(&self) -> f64 {
        self.vector.y
    }

    pub fn z(&self) -> f64 {
        self.vector.z
    }

    pub fn as_vector(&self) -> &Vector3<f64> {
        &self.vector
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.vector.x, self.vector.y, self.vector.z]
    }

    /// Applies `rotation` to this coordinate in place.
    pub fn rotate(&mut self, rotation: &Rotation) {
        *self = rotate_copy(rotation, self);
    }
}

impl From<Vector3<f64>> for Coord {
    fn from(vector: Vector3<f64>) -> Self {
        Self { vector }
    }
}

impl From<Point3<f64>> for Coord {
    fn from(point: Point3<f64>) -> Self {
        Self {
            vector: point.coords,
        }
    }
}

impl From<[f64; 3]> for Coord {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Coord> for Vector3<f64> {
    fn from(coord: Coord) -> Self {
        coord.vector
    }
}

impl From<Coord> for Point3<f64> {
    fn from(coord: Coord) -> Self {
        Point3::from(coord.vector)
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        squared_distance_between_points(self, other) < COORD_EQUALITY_TOLERANCE_SQUARED
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}

impl Add for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Coord {
        Coord::from(self.vector + rhs.vector)
    }
}

impl Sub for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Coord {
        Coord::from(self.vector - rhs.vector)
    }
}

impl Neg for Coord {
    type Output = Coord;
    fn neg(self) -> Coord {
        Coord::from(-self.vector)
    }
}

impl Mul<f64> for Coord {
    type Output = Coord;
    fn mul(self, rhs: f64) -> Coord {
        Coord::from(self.vector * rhs)
    }
}

impl Mul<Coord> for f64 {
    type Output = Coord;
    fn mul(self, rhs: Coord) -> Coord {
        rhs * self
    }
}

impl Div<f64> for Coord {
    type Output = Coord;
    fn div(self, rhs: f64) -> Coord {
        Coord::from(self.vector / rhs)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        self.vector += rhs.vector;
    }
}

impl SubAssign for Coord {
    fn sub_assign(&mut self, rhs: Coord) {
        self.vector -= rhs.vector;
    }
}

impl MulAssign<f64> for Coord {
    fn mul_assign(&mut self, rhs: f64) {
        self.vector *= rhs;
    }
}

impl DivAssign<f64> for Coord {
    fn div_assign(&mut self, rhs: f64) {
        self.vector /= rhs;
    }
}

pub fn dot_product(a: &Coord, b: &Coord) -> f64 {
    a.vector.dot(&b.vector)
}

pub fn cross_product(a: &Coord, b: &Coord) -> Coord {
    Coord::from(a.vector.cross(&b.vector))
}

pub fn squared_length(coord: &Coord) -> f64 {
    coord.vector.norm_squared()
}

pub fn length(coord: &Coord) -> f64 {
    coord.vector.norm()
}

pub fn squared_distance_between_points(a: &Coord, b: &Coord) -> f64 {
    squared_length(&(*a - *b))
}

pub fn distance_between_points(a: &Coord, b: &Coord) -> f64 {
    length(&(*a - *b))
}

/// Returns the unit vector in the direction of `coord`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroLength`] if the length is zero, subnormal or
/// not finite.
pub fn normalise_copy(coord: &Coord) -> Result<Coord, GeometryError> {
    let coord_length = length(coord);
    if !coord_length.is_normal() {
        return Err(GeometryError::ZeroLength {
            length: coord_length,
        });
    }
    Ok(*coord / coord_length)
}

/// Length of the projection of `source` onto the direction of `dirn`.
pub fn scalar_component(source: &Coord, dirn: &Coord) -> Result<f64, GeometryError> {
    Ok(dot_product(source, &normalise_copy(dirn)?))
}

pub fn parallel_component_copy(source: &Coord, dirn: &Coord) -> Result<Coord, GeometryError> {
    let unit_dirn = normalise_copy(dirn)?;
    Ok(unit_dirn * dot_product(source, &unit_dirn))
}

pub fn perpendicular_component_copy(source: &Coord, dirn: &Coord) -> Result<Coord, GeometryError> {
    Ok(*source - parallel_component_copy(source, dirn)?)
}

/// The unsigned angle between two vectors, in `[0, π]`.
///
/// # Errors
///
/// Fails with [`GeometryError::ZeroLength`] rather than yielding NaN when
/// either vector has no usable length.
pub fn angle_between_two_vectors(a: &Coord, b: &Coord) -> Result<Angle, GeometryError> {
    let unit_a = normalise_copy(a)?;
    let unit_b = normalise_copy(b)?;
    let cosine = dot_product(&unit_a, &unit_b).clamp(-1.0, 1.0);
    Angle::from_radians(cosine.acos())
}

/// The angle at vertex `b` between the rays to `a` and `c`.
pub fn angle_between_three_points(
    a: &Coord,
    b: &Coord,
    c: &Coord,
) -> Result<Angle, GeometryError> {
    angle_between_two_vectors(&(*a - *b), &(*c - *b))
}

/// The signed dihedral angle about the `b`-`c` axis, in `[-π, π]`.
///
/// The sign follows the handedness of the turn from the `a-b-c` plane to the
/// `b-c-d` plane (positive for clockwise when looking from `b` towards `c`).
pub fn dihedral_angle_between_four_points(
    a: &Coord,
    b: &Coord,
    c: &Coord,
    d: &Coord,
) -> Result<Angle, GeometryError> {
    let a_to_b = *b - *a;
    let b_to_c = *c - *b;
    let c_to_d = *d - *c;

    let first_normal = cross_product(&a_to_b, &b_to_c);
    let second_normal = cross_product(&b_to_c, &c_to_d);

    let unsigned = angle_between_two_vectors(&first_normal, &second_normal).map_err(|_| {
        GeometryError::DegenerateGeometry(format!(
            "dihedral of {a}, {b}, {c}, {d} is undefined because three of the points are colinear"
        ))
    })?;

    let handedness = dot_product(&b_to_c, &cross_product(&first_normal, &second_normal));
    Ok(if handedness < 0.0 { -unsigned } else { unsigned })
}

/// The signed angle from `a` to `b` after both are projected onto the plane
/// orthogonal to `ortho`.
///
/// Anticlockwise is positive when viewed looking along `-ortho` (i.e. with
/// `ortho` pointing at the viewer).
pub fn planar_angle_between(ortho: &Coord, a: &Coord, b: &Coord) -> Result<Angle, GeometryError> {
    let planar_a = perpendicular_component_copy(a, ortho)?;
    let planar_b = perpendicular_component_copy(b, ortho)?;
    let unsigned = angle_between_two_vectors(&planar_a, &planar_b)?;
    let handedness = dot_product(&cross_product(&planar_a, &planar_b), ortho);
    Ok(if handedness < 0.0 { -unsigned } else { unsigned })
}

/// Returns `coord` with `rotation` applied.
pub fn rotate_copy(rotation: &Rotation, coord: &Coord) -> Coord {
    Coord::from(rotation.matrix() * coord.vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn cross_product_of_x_and_y_is_z() {
        assert_eq!(cross_product(&Coord::UNIT_X, &Coord::UNIT_Y), Coord::UNIT_Z);
        assert_eq!(cross_product(&Coord::UNIT_Y, &Coord::UNIT_Z), Coord::UNIT_X);
        assert_eq!(cross_product(&Coord::UNIT_Y, &Coord::UNIT_X), -Coord::UNIT_Z);
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = Coord::new(1.0, 2.0, 3.0);
        let b = Coord::new(-1.0, 0.5, 2.0);
        assert_eq!(a + b, Coord::new(0.0, 2.5, 5.0));
        assert_eq!(a - b, Coord::new(2.0, 1.5, 1.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a / 2.0, Coord::new(0.5, 1.0, 1.5));

        let mut c = a;
        c += b;
        c -= b;
        c *= 3.0;
        c /= 3.0;
        assert_eq!(c, a);
    }

    #[test]
    fn equality_uses_a_small_distance_tolerance() {
        let a = Coord::new(1.0, 2.0, 3.0);
        assert_eq!(a, Coord::new(1.0 + 5e-6, 2.0, 3.0));
        assert_ne!(a, Coord::new(1.0 + 2e-5, 2.0, 3.0));
    }

    #[test]
    fn metrics_match_hand_computed_values() {
        let a = Coord::new(3.0, 4.0, 0.0);
        assert_eq!(length(&a), 5.0);
        assert_eq!(squared_length(&a), 25.0);
        assert_eq!(dot_product(&a, &Coord::UNIT_Y), 4.0);
        assert_eq!(distance_between_points(&a, &Coord::ORIGIN), 5.0);
        assert_eq!(squared_distance_between_points(&a, &Coord::UNIT_X), 20.0);
    }

    #[test]
    fn normalise_copy_fails_for_zero_length() {
        let result = normalise_copy(&Coord::ORIGIN);
        assert!(matches!(result, Err(GeometryError::ZeroLength { .. })));
        assert_eq!(
            result.unwrap_err().kind(),
            crate::core::geometry::ErrorKind::OutOfRange
        );
    }

    #[test]
    fn normalise_copy_returns_unit_vector() {
        let unit = normalise_copy(&Coord::new(0.0, 0.0, -7.5)).unwrap();
        assert_eq!(unit, -Coord::UNIT_Z);
    }

    #[test]
    fn components_decompose_the_source_vector() {
        let source = Coord::new(2.0, 3.0, 0.0);
        let dirn = Coord::new(5.0, 0.0, 0.0);
        assert_eq!(scalar_component(&source, &dirn).unwrap(), 2.0);
        let parallel = parallel_component_copy(&source, &dirn).unwrap();
        let perpendicular = perpendicular_component_copy(&source, &dirn).unwrap();
        assert_eq!(parallel, Coord::new(2.0, 0.0, 0.0));
        assert_eq!(perpendicular, Coord::new(0.0, 3.0, 0.0));
        assert_eq!(parallel + perpendicular, source);
    }

    #[test]
    fn angle_between_two_vectors_handles_extremes() {
        let right = angle_between_two_vectors(&Coord::UNIT_X, &Coord::UNIT_Y).unwrap();
        assert!((right.in_radians() - FRAC_PI_2).abs() < 1e-12);
        let opposite = angle_between_two_vectors(&Coord::UNIT_X, &(-3.0 * Coord::UNIT_X)).unwrap();
        assert!((opposite.in_radians() - PI).abs() < 1e-12);
        let same = angle_between_two_vectors(&Coord::UNIT_Z, &Coord::UNIT_Z).unwrap();
        assert_eq!(same.in_radians(), 0.0);
    }

    #[test]
    fn angle_between_two_vectors_rejects_zero_vector() {
        assert!(angle_between_two_vectors(&Coord::ORIGIN, &Coord::UNIT_X).is_err());
        assert!(angle_between_two_vectors(&Coord::UNIT_X, &Coord::ORIGIN).is_err());
    }

    #[test]
    fn angle_between_three_points_is_measured_at_the_middle_point() {
        let angle = angle_between_three_points(
            &Coord::new(2.0, 1.0, 0.0),
            &Coord::new(1.0, 1.0, 0.0),
            &Coord::new(2.0, 2.0, 0.0),
        )
        .unwrap();
        assert!((angle.in_radians() - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn dihedral_sign_encodes_handedness() {
        let a = Coord::new(1.0, 0.0, 0.0);
        let b = Coord::ORIGIN;
        let c = Coord::new(0.0, 0.0, 1.0);
        let d_positive = Coord::new(0.0, 1.0, 1.0);
        let d_negative = Coord::new(0.0, -1.0, 1.0);

        let positive = dihedral_angle_between_four_points(&a, &b, &c, &d_positive).unwrap();
        let negative = dihedral_angle_between_four_points(&a, &b, &c, &d_negative).unwrap();
        assert!((positive.in_degrees() - 90.0).abs() < 1e-9);
        assert!((negative.in_degrees() + 90.0).abs() < 1e-9);

        let trans = dihedral_angle_between_four_points(&a, &b, &c, &Coord::new(-1.0, 0.0, 1.0))
            .unwrap();
        assert!((trans.in_degrees().abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn dihedral_of_colinear_points_fails() {
        let result = dihedral_angle_between_four_points(
            &Coord::ORIGIN,
            &Coord::UNIT_X,
            &(2.0 * Coord::UNIT_X),
            &Coord::UNIT_Y,
        );
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn planar_angle_is_anticlockwise_positive_about_ortho() {
        let anticlockwise =
            planar_angle_between(&Coord::UNIT_Z, &Coord::UNIT_X, &Coord::new(0.0, 1.0, 5.0))
                .unwrap();
        assert!((anticlockwise.in_radians() - FRAC_PI_2).abs() < 1e-12);

        let clockwise =
            planar_angle_between(&Coord::UNIT_Z, &Coord::UNIT_X, &Coord::new(0.0, -1.0, -2.0))
                .unwrap();
        assert!((clockwise.in_radians() + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn planar_angle_fails_when_a_vector_is_along_ortho() {
        assert!(planar_angle_between(&Coord::UNIT_Z, &Coord::UNIT_Z, &Coord::UNIT_X).is_err());
    }

    #[test]
    fn rotate_applies_matrix_rows() {
        let mut coord = Coord::new(1.0, 2.0, 3.0);
        coord.rotate(&Rotation::X_TO_Y_TO_Z_TO_X);
        assert_eq!(coord, Coord::new(3.0, 1.0, 2.0));
        assert_eq!(
            rotate_copy(&Rotation::IDENTITY, &Coord::new(1.0, 2.0, 3.0)),
            Coord::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn converts_to_and_from_nalgebra_types() {
        let point = Point3::new(1.0, -2.0, 0.5);
        let coord = Coord::from(point);
        assert_eq!(Point3::from(coord), point);
        assert_eq!(Coord::from([1.0, -2.0, 0.5]), coord);
        assert_eq!(coord.to_array(), [1.0, -2.0, 0.5]);
    }
}
