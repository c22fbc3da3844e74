//! Studentized range distribution, infinite degrees of freedom
//!
//! The Nemenyi procedure needs the upper tail of the studentized range
//! distribution Q(k, ∞). With infinite error degrees of freedom the CDF
//! reduces to a single integral over the standard normal density:
//!
//! P(Q ≤ q) = k ∫ φ(z) · [Φ(z) − Φ(z − q)]^(k−1) dz
//!
//! evaluated here with composite Simpson quadrature over the range where φ
//! is non-negligible.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Integration bounds; φ(z) is below 1e-15 outside ±8
const Z_LIMIT: f64 = 8.0;

/// Simpson subintervals (even)
const STEPS: usize = 2048;

/// Survival function P(Q > q) of the studentized range with `k` groups, ∞ df
pub fn studentized_range_sf(q: f64, k: usize) -> f64 {
    if q <= 0.0 {
        return 1.0;
    }
    if k < 2 {
        return f64::NAN;
    }

    let normal = Normal::new(0.0, 1.0).unwrap();
    let integrand = |z: f64| {
        let window = normal.cdf(z) - normal.cdf(z - q);
        normal.pdf(z) * window.powi(k as i32 - 1)
    };

    // Composite Simpson over [-Z_LIMIT, Z_LIMIT]
    let h = 2.0 * Z_LIMIT / STEPS as f64;
    let mut sum = integrand(-Z_LIMIT) + integrand(Z_LIMIT);
    for i in 1..STEPS {
        let z = -Z_LIMIT + i as f64 * h;
        let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
        sum += weight * integrand(z);
    }
    let cdf = (k as f64 * sum * h / 3.0).clamp(0.0, 1.0);

    1.0 - cdf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_groups_reduces_to_normal() {
        // For k = 2, Q = |Z₁ − Z₂| with Z ~ N(0,1), so
        // P(Q > q) = 2 · (1 − Φ(q / √2))
        let normal = Normal::new(0.0, 1.0).unwrap();
        for q in [0.5, 1.0, 2.0, 3.0] {
            let expected = 2.0 * (1.0 - normal.cdf(q / std::f64::consts::SQRT_2));
            let got = studentized_range_sf(q, 2);
            assert!((got - expected).abs() < 1e-6, "q={q}: {got} vs {expected}");
        }
    }

    #[test]
    fn test_tabulated_critical_values() {
        // Upper 5% points of Q(k, ∞): q_{.05}(3) = 3.314, q_{.05}(4) = 3.633
        assert!((studentized_range_sf(3.314, 3) - 0.05).abs() < 2e-3);
        assert!((studentized_range_sf(3.633, 4) - 0.05).abs() < 2e-3);
        // Upper 1% point: q_{.01}(3) = 4.120
        assert!((studentized_range_sf(4.120, 3) - 0.01).abs() < 1e-3);
    }

    #[test]
    fn test_monotonic_in_q() {
        let mut prev = 1.0;
        for i in 1..40 {
            let sf = studentized_range_sf(i as f64 * 0.25, 3);
            assert!(sf <= prev);
            prev = sf;
        }
    }

    #[test]
    fn test_bounds() {
        assert_eq!(studentized_range_sf(0.0, 3), 1.0);
        assert_eq!(studentized_range_sf(-1.0, 3), 1.0);
        let tail = studentized_range_sf(50.0, 3);
        assert!((0.0..=1e-6).contains(&tail));
    }
}
