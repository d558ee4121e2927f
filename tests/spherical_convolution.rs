//! Convolves Watson orientation distributions with stick kernels on the
//! 724-vertex symmetric sphere and checks where the signal is most attenuated.

use approx::assert_abs_diff_eq;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sphconv::{
    cart2sphere, get_sphere, kernel_sh_to_rh, sf_to_sh, sh_convolution, sh_to_sf, BValues,
    OrientationDistribution, ResponseModel, ShTransform, ShTransformConfig, Sphere,
    SphericalConvolution, Stick, Watson, ANTIPODAL_TOLERANCE,
};
use std::f64::consts::PI;
use test_log::test;

const DIFFUSIVITY_SCALING: f64 = 1e-3;
const SH_ORDER: usize = 4;

fn watson_at_vertex(sphere: &Sphere, index: usize, kappa: f64) -> anyhow::Result<Watson> {
    let mu = sphere
        .vertex(index)
        .ok_or_else(|| anyhow::anyhow!("vertex {} out of range", index))?;
    let (_, theta, phi) = cart2sphere(mu);
    Ok(Watson::new([theta, phi], kappa)?)
}

fn assert_min_on_axis(sphere: &Sphere, signal: &Array1<f64>, mu_index: usize) -> anyhow::Result<()> {
    let min_position = sphere.argmin(&signal.view())?;
    if min_position != mu_index {
        let opposite = sphere.antipode(mu_index, ANTIPODAL_TOLERANCE);
        assert_eq!(
            opposite,
            Some(min_position),
            "minimum at vertex {} is neither {} nor its antipode",
            min_position,
            mu_index
        );
    }
    Ok(())
}

#[test]
fn test_spherical_convolution_watson_sh() -> anyhow::Result<()> {
    let sphere = get_sphere("symmetric724")?;

    let bval = 1e3;
    let lambda_par = 2e-3 * DIFFUSIVITY_SCALING;
    let stick = Stick::new([0.0, 0.0], lambda_par)?;
    let k_sf = stick.attenuation(BValues::Scalar(bval), &sphere.vertices())?;
    let k_sh = sf_to_sh(&k_sf.view(), &sphere, SH_ORDER)?;
    let k_rh = kernel_sh_to_rh(&k_sh.view(), SH_ORDER)?;
    let kernel_mean = k_sf.mean().unwrap_or(f64::NAN);

    // one fit per mean axis; reuse the basis and its inverse
    let transform = ShTransform::new(&sphere, ShTransformConfig::new(SH_ORDER))?;
    for mu_index in 0..sphere.len() {
        let watson = watson_at_vertex(&sphere, mu_index, 10.0)?;
        let f_sf = watson.density(&sphere.vertices())?;
        let f_sh = transform.sf_to_sh(&f_sf.view())?;

        let fk_convolved_sh = sh_convolution(&f_sh.view(), &k_rh.view(), SH_ORDER)?;
        let fk_convolved_sf = transform.sh_to_sf(&fk_convolved_sh.view())?;

        let convolved_mean = fk_convolved_sf.mean().unwrap_or(f64::NAN);
        assert!(
            (kernel_mean - convolved_mean).abs() < 1.5e-2,
            "mean {} differs from kernel mean {} with the Watson axis at vertex {}",
            convolved_mean,
            kernel_mean,
            mu_index
        );
        assert_min_on_axis(&sphere, &fk_convolved_sf, mu_index)?;
    }
    Ok(())
}

#[test]
fn test_free_functions_match_bound_transform() -> anyhow::Result<()> {
    let sphere = get_sphere("symmetric724")?;
    let mut rng = StdRng::seed_from_u64(724);
    let watson = watson_at_vertex(&sphere, rng.gen_range(0..sphere.len()), 10.0)?;
    let f_sf = watson.density(&sphere.vertices())?;

    let transform = ShTransform::new(&sphere, ShTransformConfig::new(SH_ORDER))?;
    let f_sh = sf_to_sh(&f_sf.view(), &sphere, SH_ORDER)?;
    assert_abs_diff_eq!(f_sh, transform.sf_to_sh(&f_sf.view())?, epsilon = 1e-12);
    assert_abs_diff_eq!(
        sh_to_sf(&f_sh.view(), &sphere, SH_ORDER)?,
        transform.sh_to_sf(&f_sh.view())?,
        epsilon = 1e-12
    );
    Ok(())
}

#[test]
fn test_concentrated_watson_with_attenuating_stick() -> anyhow::Result<()> {
    let sphere = get_sphere("symmetric724")?;
    let conv = SphericalConvolution::new(sphere.clone(), ShTransformConfig::new(SH_ORDER))?;
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..3 {
        let mu_index = rng.gen_range(0..sphere.len());
        let watson = watson_at_vertex(&sphere, mu_index, 30.0)?;
        let stick = Stick::new([0.0, 0.0], 1e-3)?;
        let signal = conv.convolve(&watson, &stick, BValues::Scalar(1000.0))?;

        assert_abs_diff_eq!(
            signal.spherical_mean()?,
            signal.kernel_sf.mean().unwrap_or(f64::NAN),
            epsilon = 1e-2
        );
        assert_min_on_axis(&sphere, &signal.convolved_sf, mu_index)?;
        let most_attenuated = conv.most_attenuated(&signal)?;
        assert!(
            most_attenuated == mu_index
                || sphere.antipode(mu_index, ANTIPODAL_TOLERANCE) == Some(most_attenuated)
        );
    }
    Ok(())
}

#[test]
fn test_watson_integrates_to_one_through_sh() -> anyhow::Result<()> {
    let sphere = get_sphere("symmetric724")?;
    for kappa in [0.0, 2.0, 10.0] {
        let watson = watson_at_vertex(&sphere, 17, kappa)?;
        let f_sh = sf_to_sh(&watson.density(&sphere.vertices())?.view(), &sphere, SH_ORDER)?;
        assert_abs_diff_eq!(f_sh[0] * (4.0 * PI).sqrt(), 1.0, epsilon = 1e-2);
    }
    Ok(())
}

#[test]
fn test_degree_zero_rh_of_fitted_kernel() -> anyhow::Result<()> {
    let sphere = get_sphere("symmetric642")?;
    let stick = Stick::new([0.0, 0.0], 1.7e-3)?;
    let k_sf = stick.attenuation(BValues::Scalar(2000.0), &sphere.vertices())?;
    let k_sh = sf_to_sh(&k_sf.view(), &sphere, 6)?;
    let k_rh = kernel_sh_to_rh(&k_sh.view(), 6)?;
    assert_eq!(k_rh.len(), 4);
    assert_abs_diff_eq!(k_rh[0], k_sh[0] * (4.0 * PI).sqrt(), epsilon = 1e-12);
    Ok(())
}
