//! Discretized unit spheres used to sample functions of orientation.

mod icosphere;
mod repulsion;

pub use self::icosphere::icosphere_vertices;
pub use self::repulsion::disperse_charges;

use crate::error::{ConvolutionError, Result};
use crate::ops::utils::EPS;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use std::f64::consts::PI;

/// Coordinate tolerance for pairing a vertex with its antipode.
///
/// Two decimals, matching how sampled spheres are commonly compared when the
/// stored vertices are not exact negations of each other. The spheres built
/// by [`Sphere::symmetric`] pair at zero tolerance.
pub const ANTIPODAL_TOLERANCE: f64 = 1e-2;

/// Relaxation steps applied to the named spheres.
pub const DISPERSION_ITERATIONS: usize = 50;

/// An immutable, ordered set of unit vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    vertices: Array2<f64>,
}

impl Sphere {
    /// Builds a sphere from an `(n, 3)` array, normalizing every row.
    pub fn from_vertices(vertices: Array2<f64>) -> Result<Self> {
        if vertices.ncols() != 3 {
            return Err(ConvolutionError::ShapeMismatch {
                what: "vertex coordinates",
                expected: 3,
                found: vertices.ncols(),
            });
        }
        if vertices.nrows() == 0 {
            return Err(ConvolutionError::invalid("vertices", "sphere needs at least one vertex"));
        }
        let mut vertices = vertices;
        for (i, mut row) in vertices.axis_iter_mut(Axis(0)).enumerate() {
            let norm = row.dot(&row).sqrt();
            if !norm.is_finite() || norm < EPS {
                return Err(ConvolutionError::invalid(
                    "vertices",
                    format!("vertex {} has zero or non-finite length", i),
                ));
            }
            row.mapv_inplace(|x| x / norm);
        }
        Ok(Self { vertices })
    }

    /// `2 · pairs` vertices: a Fibonacci lattice on the upper hemisphere,
    /// relaxed for `iterations` steps of [`disperse_charges`], followed by
    /// the exact negation of each of its points. Vertex `i` and vertex
    /// `i + pairs` are antipodes.
    ///
    /// With no relaxation the two spirals crowd each other near the equator.
    /// Relaxing costs `O(pairs² · iterations)`.
    pub fn relaxed(pairs: usize, iterations: usize) -> Result<Self> {
        let hemisphere = fibonacci_hemisphere(pairs)?;
        Ok(Self::from_pairs(disperse_charges(hemisphere, iterations)))
    }

    /// [`Sphere::relaxed`] with [`DISPERSION_ITERATIONS`] steps.
    pub fn symmetric(pairs: usize) -> Result<Self> {
        Self::relaxed(pairs, DISPERSION_ITERATIONS)
    }

    /// Subdivided icosahedron, see [`icosphere_vertices`].
    pub fn icosphere(levels: usize) -> Self {
        Self {
            vertices: icosphere_vertices(levels),
        }
    }

    /// Icosphere relaxed by [`disperse_charges`]. Its upper half comes first,
    /// then the exact negation of each of those vertices.
    pub fn dispersed_icosphere(levels: usize) -> Self {
        let hemisphere = upper_half(&icosphere_vertices(levels).view());
        Self::from_pairs(disperse_charges(hemisphere, DISPERSION_ITERATIONS))
    }

    fn from_pairs(hemisphere: Array2<f64>) -> Self {
        let pairs = hemisphere.nrows();
        let vertices = Array2::from_shape_fn((2 * pairs, 3), |(i, j)| {
            if i < pairs {
                hemisphere[[i, j]]
            } else {
                -hemisphere[[i - pairs, j]]
            }
        });
        Self { vertices }
    }

    pub fn vertices(&self) -> ArrayView2<'_, f64> {
        self.vertices.view()
    }

    pub fn len(&self) -> usize {
        self.vertices.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.nrows() == 0
    }

    pub fn vertex(&self, index: usize) -> Option<[f64; 3]> {
        if index >= self.len() {
            return None;
        }
        let row = self.vertices.row(index);
        Some([row[0], row[1], row[2]])
    }

    /// Index of the vertex closest to `-vertex(index)` among those whose
    /// coordinates all lie within `tolerance` of it.
    pub fn antipode(&self, index: usize, tolerance: f64) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        let target = self.vertices.row(index).mapv(|x| -x);
        self.vertices
            .axis_iter(Axis(0))
            .enumerate()
            .filter(|(_, row)| row.abs_diff_eq(&target, tolerance))
            .map(|(i, row)| (i, (&row - &target).mapv(|x| x * x).sum()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Index of the smallest per-vertex value, ignoring NaNs.
    pub fn argmin(&self, values: &ArrayView1<f64>) -> Result<usize> {
        self.extremum(values, |candidate, best| candidate < best)
    }

    /// Index of the largest per-vertex value, ignoring NaNs.
    pub fn argmax(&self, values: &ArrayView1<f64>) -> Result<usize> {
        self.extremum(values, |candidate, best| candidate > best)
    }

    fn extremum(&self, values: &ArrayView1<f64>, better: impl Fn(f64, f64) -> bool) -> Result<usize> {
        self.check_values(values.len())?;
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in values.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if !better(v, current) => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
            .ok_or_else(|| ConvolutionError::invalid("values", "every value is NaN"))
    }

    pub(crate) fn check_values(&self, found: usize) -> Result<()> {
        if found != self.len() {
            return Err(ConvolutionError::ShapeMismatch {
                what: "values per vertex",
                expected: self.len(),
                found,
            });
        }
        Ok(())
    }
}

/// Named sphere discretizations.
///
/// * `symmetric362`: 181 dispersed antipodal pairs
/// * `symmetric642`: icosahedron subdivided three times, then dispersed
/// * `symmetric724`: 362 dispersed antipodal pairs
pub fn get_sphere(name: &str) -> Result<Sphere> {
    match name {
        "symmetric362" => Sphere::symmetric(181),
        "symmetric642" => Ok(Sphere::dispersed_icosphere(3)),
        "symmetric724" => Sphere::symmetric(362),
        _ => Err(ConvolutionError::UnknownSphere(name.to_string())),
    }
}

fn fibonacci_hemisphere(pairs: usize) -> Result<Array2<f64>> {
    if pairs == 0 {
        return Err(ConvolutionError::invalid("pairs", "must be positive"));
    }
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    Ok(Array2::from_shape_fn((pairs, 3), |(i, j)| {
        let z = 1.0 - (i as f64 + 0.5) / pairs as f64;
        let radius = (1.0 - z * z).sqrt();
        let (sin_p, cos_p) = (golden_angle * i as f64).sin_cos();
        [radius * cos_p, radius * sin_p, z][j]
    }))
}

// One vertex of every exactly negated pair: the one whose first non-zero
// coordinate, read in z, y, x order, is positive.
fn upper_half(vertices: &ArrayView2<f64>) -> Array2<f64> {
    let rows: Vec<_> = vertices
        .axis_iter(Axis(0))
        .filter(|v| {
            v[2] > 0.0 || (v[2] == 0.0 && (v[1] > 0.0 || (v[1] == 0.0 && v[0] > 0.0)))
        })
        .collect();
    let mut half = Array2::zeros((rows.len(), 3));
    for (mut out, v) in half.axis_iter_mut(Axis(0)).zip(rows) {
        out.assign(&v);
    }
    half
}
