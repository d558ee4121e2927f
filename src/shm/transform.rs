use super::{check_sh_len, check_sh_order, degrees_and_orders, n_coefficients, real_sh_matrix};
use crate::error::{ConvolutionError, Result};
use crate::sphere::Sphere;
use log::debug;
use nalgebra::{DMatrix, SVD};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Relative cutoff below which singular values count as zero.
const RANK_EPS: f64 = 1e-10;

/// Parameters of a forward/inverse SH transform pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShTransformConfig {
    /// Maximum even SH degree `L`.
    pub sh_order: usize,
    /// Laplace-Beltrami regularization weight for the forward fit. `0` gives
    /// the plain least-squares pseudo-inverse.
    pub smooth: f64,
}

impl Default for ShTransformConfig {
    fn default() -> Self {
        Self {
            sh_order: 4,
            smooth: 0.0,
        }
    }
}

impl ShTransformConfig {
    pub fn new(sh_order: usize) -> Self {
        Self {
            sh_order,
            ..Self::default()
        }
    }

    pub fn with_smooth(mut self, smooth: f64) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sh_order(self.sh_order)?;
        if !self.smooth.is_finite() || self.smooth < 0.0 {
            return Err(ConvolutionError::invalid(
                "smooth",
                format!("must be finite and >= 0, got {}", self.smooth),
            ));
        }
        Ok(())
    }
}

/// SH fit and reconstruction bound to one sphere.
///
/// The basis matrix `B` (vertices × coefficients) and its left inverse are
/// computed once; `sf_to_sh` and `sh_to_sf` are then plain matrix products.
#[derive(Debug, Clone)]
pub struct ShTransform {
    config: ShTransformConfig,
    basis: Array2<f64>,
    inverse: Array2<f64>,
}

impl ShTransform {
    pub fn new(sphere: &Sphere, config: ShTransformConfig) -> Result<Self> {
        config.validate()?;
        let n_coeffs = n_coefficients(config.sh_order)?;
        if sphere.len() < n_coeffs {
            return Err(ConvolutionError::SingularBasis(format!(
                "{} vertices cannot determine {} coefficients",
                sphere.len(),
                n_coeffs
            )));
        }

        let basis = real_sh_matrix(config.sh_order, &sphere.vertices())?;
        let inverse = left_inverse(&basis.view(), config)?;
        debug!(
            "built SH transform: order {}, {} coefficients, {} vertices, smooth {}",
            config.sh_order,
            n_coeffs,
            sphere.len(),
            config.smooth
        );

        Ok(Self {
            config,
            basis,
            inverse,
        })
    }

    pub fn sh_order(&self) -> usize {
        self.config.sh_order
    }

    pub fn n_vertices(&self) -> usize {
        self.basis.nrows()
    }

    pub fn n_coefficients(&self) -> usize {
        self.basis.ncols()
    }

    /// Projects one value per vertex onto the SH basis.
    pub fn sf_to_sh(&self, values: &ArrayView1<f64>) -> Result<Array1<f64>> {
        if values.len() != self.n_vertices() {
            return Err(ConvolutionError::ShapeMismatch {
                what: "values per vertex",
                expected: self.n_vertices(),
                found: values.len(),
            });
        }
        Ok(self.inverse.dot(values))
    }

    /// Samples an SH expansion at every vertex.
    pub fn sh_to_sf(&self, sh: &ArrayView1<f64>) -> Result<Array1<f64>> {
        check_sh_len("SH coefficients", self.sh_order(), sh.len())?;
        Ok(self.basis.dot(sh))
    }
}

// (BᵀB + smooth·L²)⁻¹ Bᵀ with L = diag(-l(l+1)), or the SVD pseudo-inverse
// when unregularized.
fn left_inverse(basis: &ArrayView2<f64>, config: ShTransformConfig) -> Result<Array2<f64>> {
    let (rows, cols) = basis.dim();
    let b = DMatrix::from_fn(rows, cols, |i, j| basis[[i, j]]);

    let inverse = if config.smooth > 0.0 {
        let bt = b.transpose();
        let mut normal = &bt * &b;
        for (j, (l, _)) in degrees_and_orders(config.sh_order)?.into_iter().enumerate() {
            let laplacian = (l * (l + 1)) as f64;
            normal[(j, j)] += config.smooth * laplacian * laplacian;
        }
        let cholesky = normal.cholesky().ok_or_else(|| {
            ConvolutionError::SingularBasis("regularized normal matrix is not positive definite".to_string())
        })?;
        cholesky.solve(&bt)
    } else {
        let svd = SVD::new(b, true, true);
        let largest = svd.singular_values.max();
        let smallest = svd.singular_values.min();
        if smallest <= RANK_EPS * largest {
            return Err(ConvolutionError::SingularBasis(format!(
                "condition number exceeds {:e}",
                1.0 / RANK_EPS
            )));
        }
        svd.pseudo_inverse(RANK_EPS * largest)
            .map_err(|e| ConvolutionError::SingularBasis(e.to_string()))?
    };

    Ok(Array2::from_shape_fn((cols, rows), |(i, j)| inverse[(i, j)]))
}

/// Fits SH coefficients of maximum degree `sh_order` to values sampled on
/// `sphere`.
pub fn sf_to_sh(values: &ArrayView1<f64>, sphere: &Sphere, sh_order: usize) -> Result<Array1<f64>> {
    sphere.check_values(values.len())?;
    ShTransform::new(sphere, ShTransformConfig::new(sh_order))?.sf_to_sh(values)
}

/// Evaluates SH coefficients of maximum degree `sh_order` on `sphere`.
///
/// Only the basis is needed here, so any sphere works regardless of how many
/// vertices it has.
pub fn sh_to_sf(sh: &ArrayView1<f64>, sphere: &Sphere, sh_order: usize) -> Result<Array1<f64>> {
    check_sh_len("SH coefficients", sh_order, sh.len())?;
    Ok(real_sh_matrix(sh_order, &sphere.vertices())?.dot(sh))
}
