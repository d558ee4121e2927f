use super::{check_directions, map_squared_cosine, orientation, OrientationDistribution};
use crate::error::{ConvolutionError, Result};
use crate::ops::special::hyp1f1_half_scaled;
use ndarray::{Array1, ArrayView2};
use std::f64::consts::PI;

/// Watson distribution on the sphere.
///
/// `W(n) = exp(κ (μ·n)²) / (4π · 1F1(1/2; 3/2; κ))`, which integrates to one.
/// It peaks along `±μ`, and `κ = 0` is the uniform density `1 / 4π`.
#[derive(Debug, Clone, PartialEq)]
pub struct Watson {
    mu: [f64; 3],
    kappa: f64,
    // log(4π · exp(-κ) · 1F1(1/2; 3/2; κ))
    log_norm: f64,
}

impl Watson {
    /// `mu` is the mean axis as `(polar, azimuth)`; `kappa` must be `>= 0`.
    pub fn new(mu: [f64; 2], kappa: f64) -> Result<Self> {
        if !kappa.is_finite() || kappa < 0.0 {
            return Err(ConvolutionError::invalid(
                "kappa",
                format!("must be finite and >= 0, got {}", kappa),
            ));
        }
        let mu = orientation(mu)?;
        let log_norm = (4.0 * PI * hyp1f1_half_scaled(kappa)).ln();
        Ok(Self { mu, kappa, log_norm })
    }

    pub fn mu(&self) -> [f64; 3] {
        self.mu
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    #[inline]
    fn evaluate(&self, cos_sq: f64) -> f64 {
        // exp(κ(t² - 1)) keeps the exponent <= 0 for any κ
        (self.kappa * (cos_sq - 1.0) - self.log_norm).exp()
    }
}

impl OrientationDistribution for Watson {
    fn density(&self, n: &ArrayView2<f64>) -> Result<Array1<f64>> {
        check_directions(n)?;
        Ok(map_squared_cosine(&self.mu, n, |_, cos_sq| self.evaluate(cos_sq)))
    }

    fn density_at(&self, direction: [f64; 3]) -> f64 {
        let mu = self.mu;
        let cos = mu[0] * direction[0] + mu[1] * direction[1] + mu[2] * direction[2];
        self.evaluate(cos * cos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::directions;
    use crate::sphere::Sphere;
    use approx::assert_relative_eq;

    fn integral(watson: &Watson, sphere: &Sphere) -> f64 {
        let density = watson.density(&sphere.vertices()).unwrap();
        density.mean().unwrap() * 4.0 * PI
    }

    #[test]
    fn test_uniform_when_kappa_is_zero() {
        let watson = Watson::new([0.3, 1.2], 0.0).unwrap();
        let sphere = Sphere::symmetric(50).unwrap();
        for value in watson.density(&sphere.vertices()).unwrap().iter() {
            assert_relative_eq!(*value, 1.0 / (4.0 * PI), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_integrates_to_one() {
        let sphere = Sphere::relaxed(2000, 0).unwrap();
        for kappa in [0.0, 1.0, 5.0, 10.0] {
            let watson = Watson::new([1.1, 0.4], kappa).unwrap();
            assert_relative_eq!(integral(&watson, &sphere), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_peaks_at_mean_and_antipode() {
        let watson = Watson::new([0.8, 2.0], 10.0).unwrap();
        let mu = watson.mu();
        let peak = watson.density_at(mu);
        assert_relative_eq!(watson.density_at([-mu[0], -mu[1], -mu[2]]), peak, epsilon = 1e-12);

        let sphere = Sphere::symmetric(362).unwrap();
        let density = watson.density(&sphere.vertices()).unwrap();
        assert!(density.iter().all(|&d| d <= peak));
    }

    #[test]
    fn test_large_kappa_stays_finite() {
        let watson = Watson::new([0.0, 0.0], 1e5).unwrap();
        let peak = watson.density_at([0.0, 0.0, 1.0]);
        assert!(peak.is_finite());
        // concentrated density approaches κ / 2π at the poles
        assert_relative_eq!(peak, 1e5 / (2.0 * PI), max_relative = 1e-3);
        assert_eq!(watson.density_at([1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_density_matches_single_direction() {
        let watson = Watson::new([0.5, 0.5], 3.0).unwrap();
        let n = directions(&[[1.0, 0.0, 0.0], [0.0, 0.6, 0.8]]);
        let batch = watson.density(&n.view()).unwrap();
        assert_relative_eq!(batch[0], watson.density_at([1.0, 0.0, 0.0]));
        assert_relative_eq!(batch[1], watson.density_at([0.0, 0.6, 0.8]));
    }

    #[test]
    fn test_invalid_kappa() {
        assert!(matches!(
            Watson::new([0.0, 0.0], -1.0),
            Err(ConvolutionError::InvalidParameter { name: "kappa", .. })
        ));
        assert!(Watson::new([0.0, 0.0], f64::INFINITY).is_err());
    }
}
