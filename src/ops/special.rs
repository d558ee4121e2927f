//! Special functions needed by the orientation distributions.

/// Below this concentration the power series is summed directly.
const SERIES_LIMIT: f64 = 30.0;
const MAX_TERMS: usize = 500;

/// `exp(-x) · 1F1(1/2; 3/2; x)`, finite for every `x ≥ 0`.
///
/// Kummer's function `1F1(1/2; 3/2; x) = ∫₀¹ exp(x s²) ds` normalizes the
/// Watson distribution; it overflows for `x` beyond ~700, the scaled form
/// does not.
pub fn hyp1f1_half_scaled(x: f64) -> f64 {
    if x <= SERIES_LIMIT {
        series(x) * (-x).exp()
    } else {
        asymptotic_scaled(x)
    }
}

// sum_k x^k / (k! (2k + 1))
fn series(x: f64) -> f64 {
    let mut power = 1.0;
    let mut sum = 1.0;
    for k in 1..MAX_TERMS {
        power *= x / k as f64;
        let term = power / (2 * k + 1) as f64;
        sum += term;
        if term.abs() <= f64::EPSILON * sum.abs() {
            break;
        }
    }
    sum
}

// exp(-x) ∫₀¹ exp(x s²) ds ~ 1/(2x) · sum_n (2n - 1)!! / (2x)^n
fn asymptotic_scaled(x: f64) -> f64 {
    let inv = 1.0 / (2.0 * x);
    let mut term = 1.0;
    let mut sum = 1.0;
    for n in 1..MAX_TERMS {
        let next = term * (2 * n - 1) as f64 * inv;
        // the series is divergent; stop at its smallest term
        if next >= term {
            break;
        }
        term = next;
        sum += term;
        if term <= f64::EPSILON * sum {
            break;
        }
    }
    sum * inv
}
