use super::error::GeometryError;
use nalgebra::RealField;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Closeness (in degrees) at which a shifted value is treated as lying on a window boundary.
const SHIFT_BOUNDARY_EPSILON_DEGREES: f64 = 1e-10;

/// Which end of a shift window is retained when an angle lands on a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AngleEndpoint {
    /// Half-open window `[lower, lower + revolution)`.
    #[default]
    UseLower,
    /// Half-open window `(lower, lower + revolution]`.
    UseUpper,
}

/// A finite angle, stored in radians.
///
/// The only ways to build an `Angle` from raw numbers are the `from_*`
/// constructors, all of which reject non-finite values. Equality and ordering
/// compare the underlying radian values exactly; there is no tolerance.
///
/// # Panics
///
/// The `+`, `-`, `*` and `/` operators panic if the result would not be
/// finite (e.g. dividing by zero). Use [`Angle::checked_div`] and friends to
/// get a [`GeometryError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle<T = f64> {
    radians: T,
}

fn to_f64<T: RealField + Copy>(value: T) -> f64 {
    nalgebra::try_convert::<T, f64>(value).unwrap_or(f64::NAN)
}

impl<T: RealField + Copy> Angle<T> {
    fn checked(radians: T) -> Result<Self, GeometryError> {
        if radians.is_finite() {
            Ok(Self { radians })
        } else {
            Err(GeometryError::NonFiniteAngle {
                value: to_f64(radians),
            })
        }
    }

    /// For values that are finite by construction, such as the result of `acos`.
    pub(crate) fn from_finite_radians(radians: T) -> Self {
        debug_assert!(radians.is_finite());
        Self { radians }
    }

    pub fn from_radians(radians: T) -> Result<Self, GeometryError> {
        Self::checked(radians)
    }

    pub fn from_degrees(degrees: T) -> Result<Self, GeometryError> {
        Self::checked(degrees * T::pi() / nalgebra::convert::<f64, T>(180.0))
    }

    pub fn from_revolutions(revolutions: T) -> Result<Self, GeometryError> {
        Self::checked(revolutions * T::two_pi())
    }

    pub fn zero() -> Self {
        Self { radians: T::zero() }
    }

    pub fn half_revolution() -> Self {
        Self { radians: T::pi() }
    }

    pub fn one_revolution() -> Self {
        Self {
            radians: T::two_pi(),
        }
    }

    pub fn in_radians(&self) -> T {
        self.radians
    }

    pub fn in_degrees(&self) -> T {
        self.radians * nalgebra::convert::<f64, T>(180.0) / T::pi()
    }

    pub fn in_revolutions(&self) -> T {
        self.radians / T::two_pi()
    }

    pub fn sin(&self) -> T {
        self.radians.sin()
    }

    pub fn cos(&self) -> T {
        self.radians.cos()
    }

    pub fn tan(&self) -> T {
        self.radians.tan()
    }

    /// Normalises into `[0, 2π)` by stepping one revolution at a time.
    ///
    /// Only suitable when the value is expected to be a small number of
    /// revolutions away from the target range; use [`Angle::shift`] otherwise.
    pub fn quick_shift(self) -> Self {
        let revolution = T::two_pi();
        let mut value = self.radians;
        while value < T::zero() {
            value += revolution;
        }
        while value >= revolution {
            value -= revolution;
        }
        if value < T::zero() {
            value = T::zero();
        }
        Self { radians: value }
    }

    /// Maps the angle into the one-revolution window anchored at `lower`.
    ///
    /// With [`AngleEndpoint::UseLower`] the result lies in `[lower, lower + rev)`;
    /// with [`AngleEndpoint::UseUpper`] it lies in `(lower, lower + rev]`. A value
    /// within 1e-10° of the excluded endpoint is reported as the retained one.
    pub fn shift(self, lower: Angle<T>, endpoint: AngleEndpoint) -> Self {
        let revolution = T::two_pi();
        let lower = lower.radians;
        let upper = lower + revolution;
        let epsilon = nalgebra::convert::<f64, T>(SHIFT_BOUNDARY_EPSILON_DEGREES) * T::pi()
            / nalgebra::convert::<f64, T>(180.0);

        let mut value = self.radians;
        if value < lower - revolution || value > upper + revolution {
            value = lower + (value - lower) % revolution;
        }

        match endpoint {
            AngleEndpoint::UseLower => {
                while value < lower {
                    value += revolution;
                }
                while value >= upper {
                    value -= revolution;
                }
                if value < lower || upper - value < epsilon {
                    value = lower;
                }
            }
            AngleEndpoint::UseUpper => {
                while value <= lower {
                    value += revolution;
                }
                while value > upper {
                    value -= revolution;
                }
                if value <= lower || value - lower < epsilon {
                    value = upper;
                }
            }
        }
        Self { radians: value }
    }

    /// Shifts into `[0, 2π)`.
    pub fn shift_default(self) -> Self {
        self.shift(Self::zero(), AngleEndpoint::UseLower)
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, GeometryError> {
        Self::checked(self.radians + rhs.radians)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, GeometryError> {
        Self::checked(self.radians - rhs.radians)
    }

    pub fn checked_mul(self, rhs: T) -> Result<Self, GeometryError> {
        Self::checked(self.radians * rhs)
    }

    /// Divides by a scalar, failing rather than producing NaN or an infinity.
    pub fn checked_div(self, rhs: T) -> Result<Self, GeometryError> {
        Self::checked(self.radians / rhs)
    }

    #[cfg(test)]
    pub(crate) fn from_unchecked_radians(radians: T) -> Self {
        Self { radians }
    }
}

fn finite_or_panic<T: RealField + Copy>(
    result: Result<Angle<T>, GeometryError>,
    op: &str,
) -> Angle<T> {
    match result {
        Ok(angle) => angle,
        Err(e) => panic!("angle {op} produced a non-finite value: {e}"),
    }
}

/// Minimum circular distance between two angles that already share a range.
pub fn unshifted_wrapped_difference<T: RealField + Copy>(a: Angle<T>, b: Angle<T>) -> Angle<T> {
    let (smaller, larger) = if a <= b { (a, b) } else { (b, a) };
    let direct = larger - smaller;
    let wrapped = smaller + Angle::one_revolution() - larger;
    if direct <= wrapped { direct } else { wrapped }
}

/// Minimum circular distance between two arbitrary angles, in `[0, π]`.
pub fn wrapped_difference<T: RealField + Copy>(a: Angle<T>, b: Angle<T>) -> Angle<T> {
    unshifted_wrapped_difference(a.shift_default(), b.shift_default())
}

impl<T: RealField + Copy> Add for Angle<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        finite_or_panic(self.checked_add(rhs), "addition")
    }
}

impl<T: RealField + Copy> Sub for Angle<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        finite_or_panic(self.checked_sub(rhs), "subtraction")
    }
}

impl<T: RealField + Copy> Neg for Angle<T> {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            radians: -self.radians,
        }
    }
}

impl<T: RealField + Copy> Mul<T> for Angle<T> {
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        finite_or_panic(self.checked_mul(rhs), "multiplication")
    }
}

impl<T: RealField + Copy> Div<T> for Angle<T> {
    type Output = Self;
    fn div(self, rhs: T) -> Self {
        finite_or_panic(self.checked_div(rhs), "division")
    }
}

impl<T: RealField + Copy> Div<Angle<T>> for Angle<T> {
    type Output = T;
    fn div(self, rhs: Angle<T>) -> T {
        self.radians / rhs.radians
    }
}

impl<T: RealField + Copy> AddAssign for Angle<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: RealField + Copy> SubAssign for Angle<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: RealField + Copy> MulAssign<T> for Angle<T> {
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: RealField + Copy> DivAssign<T> for Angle<T> {
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

impl<T: RealField + Copy> fmt::Display for Angle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.in_degrees())
    }
}
