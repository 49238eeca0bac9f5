//! Polynomial root finding for transfer-function zero analysis

use num_complex::Complex64;
use std::f64::consts::PI;

const MAX_ITERATIONS: usize = 1000;
const CONVERGENCE_TOL: f64 = 1e-12;
const COEFF_EPSILON: f64 = 1e-300;

/// Outcome of a simultaneous-iteration root solve
#[derive(Debug, Clone)]
pub struct PolynomialRoots {
    pub roots: Vec<Complex64>,
    pub converged: bool,
    pub iterations: usize,
}

impl PolynomialRoots {
    pub fn max_magnitude(&self) -> f64 {
        self.roots.iter().map(|r| r.norm()).fold(0.0f64, f64::max)
    }
}

/// Find all complex roots of a polynomial given by descending-power real
/// coefficients (`coeffs[0]` multiplies the highest power). This is the
/// natural layout for FIR taps: the zeros of
/// `h[0]*z^(m-1) + h[1]*z^(m-2) + ... + h[m-1]` are the zeros of the
/// filter's transfer function.
///
/// Durand-Kerner iteration: all roots start on a ring of radius 0.9 with a
/// small angular offset to break symmetry, and every sweep moves each
/// estimate by p(z_i) / prod(z_i - z_j). Trailing zero coefficients are
/// factored out first as exact roots at the origin.
pub fn find_roots(coeffs: &[f64]) -> PolynomialRoots {
    let lead = coeffs
        .iter()
        .position(|c| c.abs() > COEFF_EPSILON)
        .unwrap_or(coeffs.len());
    let trimmed = &coeffs[lead..];

    let trailing = trimmed
        .iter()
        .rev()
        .take_while(|c| c.abs() <= COEFF_EPSILON)
        .count();
    let trimmed = &trimmed[..trimmed.len() - trailing];

    if trimmed.len() <= 1 {
        // Constant (or identically zero) polynomial: only the factored-out
        // origin roots remain
        return PolynomialRoots {
            roots: vec![Complex64::new(0.0, 0.0); trailing],
            converged: true,
            iterations: 0,
        };
    }

    let degree = trimmed.len() - 1;
    let leading = trimmed[0];
    let p: Vec<Complex64> = trimmed
        .iter()
        .map(|&c| Complex64::new(c / leading, 0.0))
        .collect();

    let radius = 0.9;
    let mut roots: Vec<Complex64> = (0..degree)
        .map(|k| {
            let angle = 2.0 * PI * (k as f64 + 0.3) / degree as f64;
            Complex64::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..MAX_ITERATIONS {
        let mut max_correction = 0.0f64;

        for i in 0..degree {
            let z = roots[i];

            let mut val = Complex64::new(0.0, 0.0);
            for &c in &p {
                val = val * z + c;
            }

            let mut denom = Complex64::new(1.0, 0.0);
            for (j, &other) in roots.iter().enumerate() {
                if j != i {
                    denom *= z - other;
                }
            }
            if denom.norm() <= COEFF_EPSILON {
                continue;
            }

            let correction = val / denom;
            roots[i] = z - correction;
            max_correction = max_correction.max(correction.norm());
        }

        iterations = iter + 1;
        if max_correction < CONVERGENCE_TOL {
            converged = true;
            break;
        }
    }

    roots.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(trailing));

    PolynomialRoots {
        roots,
        converged,
        iterations,
    }
}
