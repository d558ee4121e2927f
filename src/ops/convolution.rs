//! Convolution of functions on the sphere with axially symmetric kernels.
//!
//! A kernel `k` that is symmetric about +z has SH coefficients only at order
//! `m = 0`. By the Funk-Hecke theorem, convolving any `f` with it multiplies
//! every coefficient `f_lm` by the same per-degree scalar
//!
//! ```text
//! rh_l = sqrt(4π / (2l + 1)) · k_l0
//! ```
//!
//! the rotational-harmonic (RH) coefficient of `k` at degree `l`.

use crate::error::{ConvolutionError, Result};
use crate::shm::{check_sh_len, check_sh_order, sh_index};
use log::trace;
use ndarray::{s, Array1, ArrayView1};
use std::f64::consts::PI;

/// Number of RH coefficients for maximum even degree `sh_order`.
pub fn n_rh_coefficients(sh_order: usize) -> Result<usize> {
    check_sh_order(sh_order)?;
    Ok(sh_order / 2 + 1)
}

/// Converts the SH coefficients of a kernel aligned with +z into RH
/// coefficients, one per even degree.
///
/// Orders `m != 0` are ignored; for a kernel evaluated along its own axis
/// they vanish up to the accuracy of the SH fit.
pub fn kernel_sh_to_rh(k_sh: &ArrayView1<f64>, sh_order: usize) -> Result<Array1<f64>> {
    check_sh_len("kernel SH coefficients", sh_order, k_sh.len())?;

    let rh: Array1<f64> = (0..=sh_order)
        .step_by(2)
        .map(|l| k_sh[sh_index(l, 0)] * (4.0 * PI / (2 * l + 1) as f64).sqrt())
        .collect();
    for (i, value) in rh.iter().enumerate() {
        trace!("rh[l = {}] = {:e}", 2 * i, value);
    }
    Ok(rh)
}

/// SH coefficients of `f * k` from the SH coefficients of `f` and the RH
/// coefficients of `k`. Every order of degree `l` is scaled by `k_rh[l / 2]`.
pub fn sh_convolution(
    f_sh: &ArrayView1<f64>,
    k_rh: &ArrayView1<f64>,
    sh_order: usize,
) -> Result<Array1<f64>> {
    check_sh_len("ODF SH coefficients", sh_order, f_sh.len())?;
    let expected = n_rh_coefficients(sh_order)?;
    if k_rh.len() != expected {
        return Err(ConvolutionError::ShapeMismatch {
            what: "kernel RH coefficients",
            expected,
            found: k_rh.len(),
        });
    }

    let mut convolved = f_sh.to_owned();
    for (degree, &scale) in k_rh.iter().enumerate() {
        let l = 2 * degree;
        let start = sh_index(l, -(l as isize));
        let stop = sh_index(l, l as isize);
        convolved
            .slice_mut(s![start..=stop])
            .mapv_inplace(|c| c * scale);
    }
    Ok(convolved)
}
