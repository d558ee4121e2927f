use super::{check_directions, check_positive, map_squared_cosine, orientation, BValues, ResponseModel};
use crate::error::{ConvolutionError, Result};
use ndarray::{Array1, ArrayView2};

/// Axially symmetric diffusion tensor:
/// `E(b, n) = exp(-b (λ⊥ + (λ∥ - λ⊥)(μ·n)²))`.
///
/// With `λ⊥ = 0` this is a [`Stick`](super::Stick).
#[derive(Debug, Clone, PartialEq)]
pub struct Zeppelin {
    mu: [f64; 3],
    lambda_par: f64,
    lambda_perp: f64,
}

impl Zeppelin {
    pub fn new(mu: [f64; 2], lambda_par: f64, lambda_perp: f64) -> Result<Self> {
        check_positive("lambda_par", lambda_par)?;
        if !lambda_perp.is_finite() || lambda_perp < 0.0 {
            return Err(ConvolutionError::invalid(
                "lambda_perp",
                format!("must be finite and >= 0, got {}", lambda_perp),
            ));
        }
        Ok(Self {
            mu: orientation(mu)?,
            lambda_par,
            lambda_perp,
        })
    }

    pub fn mu(&self) -> [f64; 3] {
        self.mu
    }
}

impl ResponseModel for Zeppelin {
    fn attenuation(&self, bvals: BValues<'_>, n: &ArrayView2<f64>) -> Result<Array1<f64>> {
        check_directions(n)?;
        let bvals = bvals.broadcast(n.nrows())?;
        let delta = self.lambda_par - self.lambda_perp;
        Ok(map_squared_cosine(&self.mu, n, |i, cos_sq| {
            (-bvals[i] * (self.lambda_perp + delta * cos_sq)).exp()
        }))
    }

    fn with_orientation(&self, mu: [f64; 2]) -> Result<Self> {
        Ok(Self {
            mu: orientation(mu)?,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{directions, Stick};
    use crate::sphere::Sphere;
    use approx::assert_relative_eq;

    #[test]
    fn test_reduces_to_stick() {
        let sphere = Sphere::symmetric(40).unwrap();
        let zeppelin = Zeppelin::new([0.7, 0.2], 2e-3, 0.0).unwrap();
        let stick = Stick::new([0.7, 0.2], 2e-3).unwrap();
        let a = zeppelin.attenuation(BValues::Scalar(1500.0), &sphere.vertices()).unwrap();
        let b = stick.attenuation(BValues::Scalar(1500.0), &sphere.vertices()).unwrap();
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_isotropic_when_diffusivities_match() {
        let zeppelin = Zeppelin::new([0.0, 0.0], 1e-3, 1e-3).unwrap();
        let n = directions(&[[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let e = zeppelin.attenuation(BValues::Scalar(1000.0), &n.view()).unwrap();
        assert_relative_eq!(e[0], (-1.0_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(e[1], (-1.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_perpendicular_diffusivity() {
        assert!(Zeppelin::new([0.0, 0.0], 1e-3, -1e-4).is_err());
        assert!(Zeppelin::new([0.0, 0.0], 0.0, 1e-4).is_err());
    }
}
