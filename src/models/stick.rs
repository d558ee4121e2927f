use super::{check_directions, check_positive, map_squared_cosine, orientation, BValues, ResponseModel};
use crate::error::Result;
use ndarray::{Array1, ArrayView2};

/// Diffusion restricted to a line: `E(b, n) = exp(-b λ∥ (μ·n)²)`.
///
/// The perpendicular diffusivity is zero, so directions orthogonal to `μ` are
/// not attenuated and the strongest attenuation is along `±μ`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stick {
    mu: [f64; 3],
    lambda_par: f64,
}

impl Stick {
    /// `mu` as `(polar, azimuth)`; `lambda_par` is the parallel diffusivity.
    pub fn new(mu: [f64; 2], lambda_par: f64) -> Result<Self> {
        check_positive("lambda_par", lambda_par)?;
        Ok(Self {
            mu: orientation(mu)?,
            lambda_par,
        })
    }

    pub fn mu(&self) -> [f64; 3] {
        self.mu
    }

    pub fn lambda_par(&self) -> f64 {
        self.lambda_par
    }
}

impl ResponseModel for Stick {
    fn attenuation(&self, bvals: BValues<'_>, n: &ArrayView2<f64>) -> Result<Array1<f64>> {
        check_directions(n)?;
        let bvals = bvals.broadcast(n.nrows())?;
        Ok(map_squared_cosine(&self.mu, n, |i, cos_sq| {
            (-bvals[i] * self.lambda_par * cos_sq).exp()
        }))
    }

    fn with_orientation(&self, mu: [f64; 2]) -> Result<Self> {
        Ok(Self {
            mu: orientation(mu)?,
            lambda_par: self.lambda_par,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvolutionError;
    use crate::models::directions;
    use approx::assert_relative_eq;
    use ndarray::arr1;
    use std::f64::consts::FRAC_PI_2;

    const LAMBDA_PAR: f64 = 1.7e-3;

    #[test]
    fn test_attenuation_along_and_across_axis() {
        let stick = Stick::new([0.0, 0.0], LAMBDA_PAR).unwrap();
        let n = directions(&[[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]]);
        let e = stick.attenuation(BValues::Scalar(1000.0), &n.view()).unwrap();
        let along = (-1000.0 * LAMBDA_PAR).exp();
        assert_relative_eq!(e, arr1(&[along, 1.0, along]), epsilon = 1e-12);
    }

    #[test]
    fn test_per_direction_bvalues() {
        let stick = Stick::new([FRAC_PI_2, 0.0], LAMBDA_PAR).unwrap();
        let n = directions(&[[1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let b = arr1(&[0.0, 3000.0]);
        let e = stick.attenuation(b.view().into(), &n.view()).unwrap();
        assert_relative_eq!(e[0], 1.0);
        assert_relative_eq!(e[1], (-3000.0 * LAMBDA_PAR).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_reorientation() {
        let stick = Stick::new([FRAC_PI_2, 0.0], LAMBDA_PAR).unwrap();
        let aligned = stick.with_orientation([0.0, 0.0]).unwrap();
        assert!(stick.with_orientation([f64::NAN, 0.0]).is_err());
        assert_eq!(aligned.mu(), [0.0, 0.0, 1.0]);
        assert_eq!(aligned.lambda_par(), LAMBDA_PAR);
    }

    #[test]
    fn test_invalid_diffusivity() {
        assert!(matches!(
            Stick::new([0.0, 0.0], 0.0),
            Err(ConvolutionError::InvalidParameter { name: "lambda_par", .. })
        ));
        assert!(Stick::new([0.0, 0.0], -1e-3).is_err());
    }
}
