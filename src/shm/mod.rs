//! Real, antipodally symmetric spherical harmonics.
//!
//! Coefficient vectors hold even degrees `l = 0, 2, ..., L` only, degree-major
//! with orders `m = -l..=l` inside each degree. A vector for maximum degree
//! `L` therefore has `(L + 1)(L + 2) / 2` entries.

mod basis;
mod transform;

pub use self::basis::{real_sh_matrix, RealShBasis};
pub use self::transform::{sf_to_sh, sh_to_sf, ShTransform, ShTransformConfig};

use crate::error::{ConvolutionError, Result};
use ndarray::ArrayView1;
use std::f64::consts::PI;

pub(crate) fn check_sh_order(sh_order: usize) -> Result<()> {
    if sh_order % 2 != 0 {
        return Err(ConvolutionError::OddShOrder(sh_order));
    }
    Ok(())
}

/// Number of coefficients for maximum even degree `sh_order`.
pub fn n_coefficients(sh_order: usize) -> Result<usize> {
    check_sh_order(sh_order)?;
    Ok((sh_order + 1) * (sh_order + 2) / 2)
}

/// Position of `(l, m)` in a coefficient vector. `l` must be even and
/// `|m| <= l`.
#[inline]
pub fn sh_index(l: usize, m: isize) -> usize {
    debug_assert!(l % 2 == 0 && m.unsigned_abs() <= l);
    l * l.saturating_sub(1) / 2 + (m + l as isize) as usize
}

/// `(l, m)` for every coefficient, in storage order.
pub fn degrees_and_orders(sh_order: usize) -> Result<Vec<(usize, isize)>> {
    check_sh_order(sh_order)?;
    Ok((0..=sh_order)
        .step_by(2)
        .flat_map(|l| (-(l as isize)..=l as isize).map(move |m| (l, m)))
        .collect())
}

/// Checks that `found` coefficients match maximum degree `sh_order`.
pub(crate) fn check_sh_len(what: &'static str, sh_order: usize, found: usize) -> Result<()> {
    let expected = n_coefficients(sh_order)?;
    if found != expected {
        return Err(ConvolutionError::ShapeMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Mean of the function over the sphere, read off its degree-0 coefficient.
pub fn spherical_mean(sh: &ArrayView1<f64>) -> Result<f64> {
    sh.first()
        .map(|c0| c0 / (4.0 * PI).sqrt())
        .ok_or(ConvolutionError::ShapeMismatch {
            what: "SH coefficients",
            expected: 1,
            found: 0,
        })
}
