pub mod convolution;
pub mod special;
pub mod utils;

pub use self::convolution::{kernel_sh_to_rh, n_rh_coefficients, sh_convolution};
pub use self::utils::{cart2sphere, cart2sphere_batched, sphere2cart};
