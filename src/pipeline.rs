//! End-to-end convolution of an orientation distribution with a response
//! kernel, sampled on a fixed sphere.

use crate::error::Result;
use crate::models::{BValues, OrientationDistribution, ResponseModel};
use crate::ops::convolution::{kernel_sh_to_rh, sh_convolution};
use crate::shm::{spherical_mean, ShTransform, ShTransformConfig};
use crate::sphere::Sphere;
use log::debug;
use ndarray::Array1;

/// Intermediate and final products of one convolution.
#[derive(Debug, Clone)]
pub struct ConvolvedSignal {
    pub odf_sf: Array1<f64>,
    pub odf_sh: Array1<f64>,
    pub kernel_sf: Array1<f64>,
    pub kernel_sh: Array1<f64>,
    pub kernel_rh: Array1<f64>,
    pub convolved_sh: Array1<f64>,
    pub convolved_sf: Array1<f64>,
}

impl ConvolvedSignal {
    /// Spherical mean of the convolved signal from its degree-0 coefficient.
    pub fn spherical_mean(&self) -> Result<f64> {
        spherical_mean(&self.convolved_sh.view())
    }
}

/// Spherical convolution bound to one sphere and SH degree.
#[derive(Debug, Clone)]
pub struct SphericalConvolution {
    sphere: Sphere,
    transform: ShTransform,
}

impl SphericalConvolution {
    pub fn new(sphere: Sphere, config: ShTransformConfig) -> Result<Self> {
        let transform = ShTransform::new(&sphere, config)?;
        Ok(Self { sphere, transform })
    }

    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    pub fn transform(&self) -> &ShTransform {
        &self.transform
    }

    /// Convolves `odf` with `kernel`. The kernel is re-aligned with +z before
    /// it is sampled, whatever orientation it was built with.
    pub fn convolve<O, K>(&self, odf: &O, kernel: &K, bvals: BValues<'_>) -> Result<ConvolvedSignal>
    where
        O: OrientationDistribution,
        K: ResponseModel,
    {
        let sh_order = self.transform.sh_order();
        let vertices = self.sphere.vertices();
        debug!(
            "convolving on {} vertices up to degree {}",
            self.sphere.len(),
            sh_order
        );

        let odf_sf = odf.density(&vertices)?;
        let odf_sh = self.transform.sf_to_sh(&odf_sf.view())?;

        let kernel_sf = kernel
            .with_orientation([0.0, 0.0])?
            .attenuation(bvals, &vertices)?;
        let kernel_sh = self.transform.sf_to_sh(&kernel_sf.view())?;
        let kernel_rh = kernel_sh_to_rh(&kernel_sh.view(), sh_order)?;

        let convolved_sh = sh_convolution(&odf_sh.view(), &kernel_rh.view(), sh_order)?;
        let convolved_sf = self.transform.sh_to_sf(&convolved_sh.view())?;

        Ok(ConvolvedSignal {
            odf_sf,
            odf_sh,
            kernel_sf,
            kernel_sh,
            kernel_rh,
            convolved_sh,
            convolved_sf,
        })
    }

    /// Vertex of strongest attenuation in a convolved signal.
    pub fn most_attenuated(&self, signal: &ConvolvedSignal) -> Result<usize> {
        self.sphere.argmin(&signal.convolved_sf.view())
    }
}
