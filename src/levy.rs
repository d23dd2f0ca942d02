//! Levy-flight step sampling for the defense phase.
//!
//! Uses the Mantegna construction: a normal sample scaled by a sigma
//! derived from the Gamma function of the stability parameter, divided
//! by `|normal|^(1/beta)`. Produces occasional long jumps on top of many
//! short steps, which is what lets the defense phase escape the
//! neighborhood of a predator.

use rand::Rng;
use rand_distr::StandardNormal;

/// Sigma used when the stability parameter makes the Gamma-based
/// formula degenerate (pole, overflow, or non-finite intermediate).
const FALLBACK_SIGMA: f64 = 0.1;

/// Draws a length-`dimension` Levy-stable-like step vector with
/// stability parameter `beta`.
///
/// The defense phase uses `beta = 1.5` and scales the result by 0.05.
pub(crate) fn levy_step<R: Rng>(dimension: usize, beta: f64, rng: &mut R) -> Vec<f64> {
    let sigma = mantegna_sigma(beta);
    (0..dimension)
        .map(|_| {
            let u: f64 = rng.sample::<f64, _>(StandardNormal) * sigma;
            let v: f64 = rng.sample(StandardNormal);
            u / v.abs().powf(1.0 / beta)
        })
        .collect()
}

/// Mantegna's sigma for the numerator normal:
/// `(Γ(1+β)·sin(πβ/2) / (Γ((1+β)/2)·β·2^((β−1)/2)))^(1/β)`.
///
/// Falls back to a fixed constant when the Gamma evaluations are
/// degenerate (non-positive-integer poles make `gamma` non-finite).
fn mantegna_sigma(beta: f64) -> f64 {
    let num = gamma(1.0 + beta) * (std::f64::consts::PI * beta / 2.0).sin();
    let den = gamma((1.0 + beta) / 2.0) * beta * 2f64.powf((beta - 1.0) / 2.0);
    let sigma = (num / den).powf(1.0 / beta);
    if sigma.is_finite() {
        sigma
    } else {
        FALLBACK_SIGMA
    }
}

/// Gamma function via the Lanczos approximation (g = 7, 9 terms),
/// extended to the negative half-plane by the reflection formula.
/// Accurate to ~15 significant digits over the range used here.
fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    // Poles at the non-positive integers; rounding in sin(πx) would
    // otherwise turn them into huge finite values
    if x <= 0.0 && x == x.floor() {
        return f64::NAN;
    }

    if x < 0.5 {
        // Reflection: Γ(x)·Γ(1−x) = π / sin(πx)
        return std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * gamma(1.0 - x));
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + G + 0.5;
    (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
}
