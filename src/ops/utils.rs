use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;
use std::f64::consts::TAU;

pub const EPS: f64 = 1e-12;

/// Converts a Cartesian 3-vector into `(r, polar, azimuth)`.
///
/// The polar angle is measured from +z and lies in `[0, π]`; the azimuth is
/// measured from +x towards +y and lies in `[0, 2π)`. The vector does not
/// need to be normalized. A zero vector maps to `(0, 0, 0)`.
pub fn cart2sphere(v: [f64; 3]) -> (f64, f64, f64) {
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if r < EPS {
        return (0.0, 0.0, 0.0);
    }
    let theta = (v[2] / r).clamp(-1.0, 1.0).acos();
    let mut phi = v[1].atan2(v[0]).rem_euclid(TAU);
    if phi >= TAU {
        phi = 0.0;
    }
    (r, theta, phi)
}

/// Unit vector for a `(polar, azimuth)` pair.
pub fn sphere2cart(theta: f64, phi: f64) -> [f64; 3] {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    [sin_t * cos_p, sin_t * sin_p, cos_t]
}

/// Row-wise `cart2sphere` over an `(n, 3)` batch. Columns of the result are
/// `r`, polar and azimuth.
pub fn cart2sphere_batched(x: &ArrayView2<f64>) -> Array2<f64> {
    let mut result = Array2::zeros((x.nrows(), 3));

    result
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let v = x.row(i);
            let (r, theta, phi) = cart2sphere([v[0], v[1], v[2]]);
            row[0] = r;
            row[1] = theta;
            row[2] = phi;
        });

    result
}
