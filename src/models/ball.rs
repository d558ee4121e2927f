use super::{check_directions, check_positive, BValues, ResponseModel};
use crate::error::Result;
use ndarray::{Array1, ArrayView2};

/// Isotropic free diffusion: `E(b) = exp(-b λ_iso)` in every direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    lambda_iso: f64,
}

impl Ball {
    pub fn new(lambda_iso: f64) -> Result<Self> {
        check_positive("lambda_iso", lambda_iso)?;
        Ok(Self { lambda_iso })
    }
}

impl ResponseModel for Ball {
    fn attenuation(&self, bvals: BValues<'_>, n: &ArrayView2<f64>) -> Result<Array1<f64>> {
        check_directions(n)?;
        let bvals = bvals.broadcast(n.nrows())?;
        Ok(bvals.mapv(|b| (-b * self.lambda_iso).exp()))
    }

    fn with_orientation(&self, _mu: [f64; 2]) -> Result<Self> {
        Ok(self.clone())
    }
}
