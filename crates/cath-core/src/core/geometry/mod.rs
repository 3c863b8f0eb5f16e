//! # Geometry Module
//!
//! Value types for rigid-body geometry: [`angle::Angle`], [`coord::Coord`] and
//! [`rotation::Rotation`], together with the free functions that operate on them.
//!
//! All three are immutable values. `Angle` and `Rotation` can only be built
//! through validating constructors, so holding one is proof that its invariants
//! (a finite angle; an orthogonal matrix with unit determinant) hold.
//!
//! Note the deliberate difference in equality: `Coord` compares with a small
//! distance tolerance, while `Angle` compares its radian values exactly.

pub mod angle;
pub mod coord;
pub mod error;
pub mod rotation;

pub use angle::{Angle, AngleEndpoint};
pub use coord::Coord;
pub use error::{ErrorKind, GeometryError};
pub use rotation::Rotation;
