//! Orientation distributions and single-compartment response models.
//!
//! Every model depends on a direction `n` only through `(μ·n)²`, so `μ` and
//! `-μ` describe the same model and all outputs are antipodally symmetric.

mod ball;
mod stick;
mod watson;
mod zeppelin;

pub use self::ball::Ball;
pub use self::stick::Stick;
pub use self::watson::Watson;
pub use self::zeppelin::Zeppelin;

use crate::error::{ConvolutionError, Result};
use crate::ops::utils::sphere2cart;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

/// Diffusion weighting for a batch of directions.
#[derive(Debug, Clone, Copy)]
pub enum BValues<'a> {
    /// One b-value shared by every direction.
    Scalar(f64),
    /// One b-value per direction.
    PerDirection(ArrayView1<'a, f64>),
}

impl From<f64> for BValues<'_> {
    fn from(b: f64) -> Self {
        BValues::Scalar(b)
    }
}

impl<'a> From<ArrayView1<'a, f64>> for BValues<'a> {
    fn from(b: ArrayView1<'a, f64>) -> Self {
        BValues::PerDirection(b)
    }
}

impl BValues<'_> {
    /// Broadcasts to one b-value per direction.
    pub fn broadcast(&self, n_directions: usize) -> Result<Array1<f64>> {
        let bvals = match self {
            BValues::Scalar(b) => Array1::from_elem(n_directions, *b),
            BValues::PerDirection(b) => {
                if b.len() != n_directions {
                    return Err(ConvolutionError::ShapeMismatch {
                        what: "b-values",
                        expected: n_directions,
                        found: b.len(),
                    });
                }
                b.to_owned()
            }
        };
        if let Some(bad) = bvals.iter().find(|b| !b.is_finite() || **b < 0.0) {
            return Err(ConvolutionError::invalid(
                "bvals",
                format!("must be finite and >= 0, got {}", bad),
            ));
        }
        Ok(bvals)
    }
}

/// A density over orientations.
pub trait OrientationDistribution {
    /// Density at every row of an `(n, 3)` batch of unit vectors.
    fn density(&self, n: &ArrayView2<f64>) -> Result<Array1<f64>>;

    /// Density at a single unit vector.
    fn density_at(&self, direction: [f64; 3]) -> f64;
}

/// Signal attenuation of one elementary diffusion compartment.
pub trait ResponseModel {
    /// Attenuation for every row of an `(n, 3)` batch of gradient directions.
    fn attenuation(&self, bvals: BValues<'_>, n: &ArrayView2<f64>) -> Result<Array1<f64>>;

    /// The same compartment with its axis along `mu = (polar, azimuth)`.
    fn with_orientation(&self, mu: [f64; 2]) -> Result<Self>
    where
        Self: Sized;
}

/// Unit vector for `(polar, azimuth)`, rejecting non-finite angles.
pub(crate) fn orientation(mu: [f64; 2]) -> Result<[f64; 3]> {
    if !mu[0].is_finite() || !mu[1].is_finite() {
        return Err(ConvolutionError::invalid(
            "mu",
            format!("angles must be finite, got {:?}", mu),
        ));
    }
    Ok(sphere2cart(mu[0], mu[1]))
}

pub(crate) fn check_directions(n: &ArrayView2<f64>) -> Result<()> {
    if n.ncols() != 3 {
        return Err(ConvolutionError::ShapeMismatch {
            what: "direction coordinates",
            expected: 3,
            found: n.ncols(),
        });
    }
    Ok(())
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConvolutionError::invalid(
            name,
            format!("must be finite and > 0, got {}", value),
        ));
    }
    Ok(())
}

/// Applies `f(i, (μ·n_i)²)` to every row of `n` in parallel.
pub(crate) fn map_squared_cosine<F>(mu: &[f64; 3], n: &ArrayView2<f64>, f: F) -> Array1<f64>
where
    F: Fn(usize, f64) -> f64 + Sync,
{
    let mut result = Array1::zeros(n.nrows());

    result
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut out)| {
            let row = n.row(i);
            let cos = mu[0] * row[0] + mu[1] * row[1] + mu[2] * row[2];
            out[()] = f(i, cos * cos);
        });

    result
}

/// `(n, 3)` array from a slice of unit vectors.
pub fn directions(vectors: &[[f64; 3]]) -> Array2<f64> {
    Array2::from_shape_fn((vectors.len(), 3), |(i, j)| vectors[i][j])
}
