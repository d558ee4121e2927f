use super::{check_sh_order, sh_index};
use crate::error::Result;
use crate::ops::utils::cart2sphere_batched;
use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut1, Axis};
use rayon::prelude::*;
use std::f64::consts::{PI, SQRT_2};

/// Normalized associated Legendre values `√((2l+1)/2π · (l-m)!/(l+m)!) P_l^m`
/// for `0 <= m <= l <= l_max`, without the Condon-Shortley phase.
#[derive(Debug, Clone)]
struct LegendreTable {
    max_degree: usize,
    data: Vec<f64>,
}

impl LegendreTable {
    fn new(max_degree: usize) -> Self {
        Self {
            max_degree,
            data: vec![0.0; (max_degree + 1) * (max_degree + 2) / 2],
        }
    }

    #[inline]
    fn index(l: usize, m: usize) -> usize {
        debug_assert!(m <= l);
        m + l * (l + 1) / 2
    }

    #[inline]
    fn get(&self, l: usize, m: usize) -> f64 {
        debug_assert!(l <= self.max_degree);
        self.data[Self::index(l, m)]
    }

    #[inline]
    fn set(&mut self, l: usize, m: usize, value: f64) {
        self.data[Self::index(l, m)] = value;
    }
}

/// Evaluates the real, even-degree spherical harmonic basis.
///
/// Column order follows [`sh_index`]: degree-major, orders `-l..=l`. Orders
/// `m < 0` carry `sin(|m|φ)`, orders `m > 0` carry `cos(mφ)`, and every
/// function has unit norm on the sphere.
#[derive(Debug, Clone)]
pub struct RealShBasis {
    sh_order: usize,
    coefficient_a: LegendreTable,
    coefficient_b: LegendreTable,
}

impl RealShBasis {
    pub fn new(sh_order: usize) -> Result<Self> {
        check_sh_order(sh_order)?;
        let mut coefficient_a = LegendreTable::new(sh_order);
        let mut coefficient_b = LegendreTable::new(sh_order);
        for l in 2..=sh_order {
            let ls = (l * l) as f64;
            let lm1s = ((l - 1) * (l - 1)) as f64;
            for m in 0..(l - 1) {
                let ms = (m * m) as f64;
                coefficient_a.set(l, m, ((4.0 * ls - 1.0) / (ls - ms)).sqrt());
                coefficient_b.set(l, m, -((lm1s - ms) / (4.0 * lm1s - 1.0)).sqrt());
            }
        }
        Ok(Self {
            sh_order,
            coefficient_a,
            coefficient_b,
        })
    }

    pub fn sh_order(&self) -> usize {
        self.sh_order
    }

    pub fn n_coefficients(&self) -> usize {
        // sh_order was validated in `new`
        (self.sh_order + 1) * (self.sh_order + 2) / 2
    }

    fn legendre(&self, cos_theta: f64, sin_theta: f64) -> LegendreTable {
        let mut p = LegendreTable::new(self.sh_order);
        let mut diagonal = 1.0 / (2.0 * PI).sqrt();
        p.set(0, 0, diagonal);
        if self.sh_order == 0 {
            return p;
        }

        p.set(1, 0, cos_theta * 3.0_f64.sqrt() * diagonal);
        diagonal *= 1.5_f64.sqrt() * sin_theta;
        p.set(1, 1, diagonal);

        for l in 2..=self.sh_order {
            for m in 0..(l - 1) {
                let value = self.coefficient_a.get(l, m)
                    * (cos_theta * p.get(l - 1, m) + self.coefficient_b.get(l, m) * p.get(l - 2, m));
                p.set(l, m, value);
            }
            p.set(l, l - 1, cos_theta * ((2 * l + 1) as f64).sqrt() * diagonal);
            diagonal *= (1.0 + 0.5 / l as f64).sqrt() * sin_theta;
            p.set(l, l, diagonal);
        }
        p
    }

    /// Writes every basis function at `(theta, phi)` into `out`.
    pub fn evaluate_into(&self, theta: f64, phi: f64, out: &mut ArrayViewMut1<f64>) {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let p = self.legendre(cos_theta, sin_theta);

        for l in (0..=self.sh_order).step_by(2) {
            out[sh_index(l, 0)] = p.get(l, 0) / SQRT_2;
            for m in 1..=l {
                let (sin_m, cos_m) = (m as f64 * phi).sin_cos();
                let p_lm = p.get(l, m);
                out[sh_index(l, m as isize)] = p_lm * cos_m;
                out[sh_index(l, -(m as isize))] = p_lm * sin_m;
            }
        }
    }

    pub fn evaluate(&self, theta: f64, phi: f64) -> Array1<f64> {
        let mut out = Array1::zeros(self.n_coefficients());
        self.evaluate_into(theta, phi, &mut out.view_mut());
        out
    }

    /// `(n, K)` matrix of the basis sampled at every row of `directions`.
    pub fn matrix(&self, directions: &ArrayView2<f64>) -> Array2<f64> {
        let angles = cart2sphere_batched(directions);
        let mut result = Array2::zeros((directions.nrows(), self.n_coefficients()));

        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, mut row)| {
                self.evaluate_into(angles[[i, 1]], angles[[i, 2]], &mut row);
            });

        result
    }
}

/// Real SH basis of degree `sh_order` sampled at `directions`.
pub fn real_sh_matrix(sh_order: usize, directions: &ArrayView2<f64>) -> Result<Array2<f64>> {
    Ok(RealShBasis::new(sh_order)?.matrix(directions))
}
