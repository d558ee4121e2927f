//! Spherical convolution of diffusion-MRI response kernels with orientation
//! distributions.
//!
//! An orientation distribution `f` and an axially symmetric kernel `k` are
//! sampled on a [`Sphere`], projected onto real spherical harmonics, and
//! combined degree by degree:
//!
//! ```text
//! f_sf ──sf_to_sh──▶ f_sh ─┐
//!                          ├─ sh_convolution ─▶ (f*k)_sh ──sh_to_sf──▶ (f*k)_sf
//! k_sf ──sf_to_sh──▶ k_sh ─┴─ kernel_sh_to_rh
//! ```
//!
//! [`SphericalConvolution`] runs the whole chain.

pub mod error;
pub mod models;
pub mod ops;
pub mod pipeline;
pub mod shm;
pub mod sphere;

pub use error::{ConvolutionError, Result};
pub use models::{BValues, Ball, OrientationDistribution, ResponseModel, Stick, Watson, Zeppelin};
pub use ops::{cart2sphere, kernel_sh_to_rh, sh_convolution, sphere2cart};
pub use pipeline::{ConvolvedSignal, SphericalConvolution};
pub use shm::{sf_to_sh, sh_to_sf, spherical_mean, ShTransform, ShTransformConfig};
pub use sphere::{get_sphere, Sphere, ANTIPODAL_TOLERANCE};
