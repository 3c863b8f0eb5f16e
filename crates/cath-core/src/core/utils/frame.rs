use crate::core::geometry::coord::{cross_product, normalise_copy};
use crate::core::geometry::rotation::rotation_to_x_axis_and_x_y_plane;
use crate::core::geometry::{Coord, GeometryError, Rotation};

/// Builds the local reference frame of a residue from its backbone N, CA and C positions.
///
/// The frame's x-axis runs along N→C and its x-y plane is fixed by the normal of the
/// N/CA/C triangle, so every residue gets a right-handed frame anchored to its own backbone.
///
/// # Errors
///
/// Coincident or colinear backbone atoms cannot define a frame and fail with
/// [`GeometryError::DegenerateGeometry`], naming the atoms involved.
pub fn construct_residue_frame(
    n: &Coord,
    ca: &Coord,
    c: &Coord,
) -> Result<Rotation, GeometryError> {
    let unit_n_to_ca = normalise_copy(&(*ca - *n))
        .map_err(|e| GeometryError::DegenerateGeometry(format!("N and CA coincide: {e}")))?;
    let unit_n_to_c = normalise_copy(&(*c - *n))
        .map_err(|e| GeometryError::DegenerateGeometry(format!("N and C coincide: {e}")))?;

    let normal = cross_product(&unit_n_to_ca, &unit_n_to_c);
    rotation_to_x_axis_and_x_y_plane(&unit_n_to_c, &normal)
        .map_err(|e| GeometryError::DegenerateGeometry(format!("N, CA and C are colinear: {e}")))
}
