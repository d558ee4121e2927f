//! Electrostatic relaxation of antipodally paired point sets.
//!
//! Every point `p` carries a unit charge and so does `-p`. Points move along
//! the tangential part of the Coulomb force until the energy stops falling,
//! which spreads the pairs evenly without breaking their symmetry.

use log::debug;
use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

/// First step length, as a fraction of the largest initial force.
const INITIAL_STEP: f64 = 0.2;

/// Relaxes the `(n, 3)` unit vectors in `hemisphere` for `iterations`
/// gradient steps. A step is kept only when it lowers the energy, otherwise
/// the step length is halved.
pub fn disperse_charges(hemisphere: Array2<f64>, iterations: usize) -> Array2<f64> {
    if iterations == 0 {
        return hemisphere;
    }
    let mut charges = hemisphere;
    let (mut forces, mut energy) = tangential_forces(&charges.view());

    let largest = forces
        .rows()
        .into_iter()
        .map(|f| f.dot(&f).sqrt())
        .fold(0.0, f64::max);
    // already balanced, or a repeated point
    if largest <= f64::EPSILON || !largest.is_finite() {
        return charges;
    }
    let mut step = INITIAL_STEP / largest;
    let mut accepted = 0;

    for _ in 0..iterations {
        let mut moved = &charges + &(&forces * step);
        for mut row in moved.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            row.mapv_inplace(|x| x / norm);
        }
        let (moved_forces, moved_energy) = tangential_forces(&moved.view());
        if moved_energy <= energy {
            charges = moved;
            forces = moved_forces;
            energy = moved_energy;
            accepted += 1;
        } else {
            step /= 2.0;
        }
    }

    debug!(
        "dispersed {} charge pairs: {} of {} steps kept, energy {:.6}",
        charges.nrows(),
        accepted,
        iterations,
        energy
    );
    charges
}

/// Tangential force on every charge, and the total Coulomb energy counted
/// once from each point of `charges`.
pub(crate) fn tangential_forces(charges: &ArrayView2<f64>) -> (Array2<f64>, f64) {
    let n = charges.nrows();
    let per_charge: Vec<([f64; 3], f64)> = (0..n)
        .into_par_iter()
        .map(|i| {
            let row = charges.row(i);
            let p = [row[0], row[1], row[2]];
            let mut force = [0.0; 3];
            let mut energy = 0.0;

            for (j, q) in charges.axis_iter(Axis(0)).enumerate() {
                for sign in [1.0, -1.0] {
                    if j == i && sign > 0.0 {
                        continue;
                    }
                    let d = [p[0] - sign * q[0], p[1] - sign * q[1], p[2] - sign * q[2]];
                    let r2 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
                    let r = r2.sqrt();
                    let inv_r3 = 1.0 / (r2 * r);
                    for k in 0..3 {
                        force[k] += d[k] * inv_r3;
                    }
                    energy += 1.0 / r;
                }
            }

            let radial = force[0] * p[0] + force[1] * p[1] + force[2] * p[2];
            for k in 0..3 {
                force[k] -= radial * p[k];
            }
            (force, energy)
        })
        .collect();

    let mut forces = Array2::zeros((n, 3));
    let mut energy = 0.0;
    for (mut row, (force, e)) in forces.axis_iter_mut(Axis(0)).zip(&per_charge) {
        row[0] = force[0];
        row[1] = force[1];
        row[2] = force[2];
        energy += e;
    }
    (forces, energy)
}
