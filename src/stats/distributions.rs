//! Standard normal distribution, used to turn an interval width into a z-score.

// Abramowitz & Stegun 7.1.26, highest power first
const ERF_COEFFS: [f64; 5] = [
    1.061405429,
    -1.453152027,
    1.421413741,
    -0.284496736,
    0.254829592,
];
const ERF_P: f64 = 0.3275911;

// Acklam's rational approximation of the normal quantile, highest power first
const CENTRAL_NUM: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
];
const CENTRAL_DEN: [f64; 6] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
    1.0,
];
const TAIL_NUM: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
];
const TAIL_DEN: [f64; 5] = [
    7.784695709041462e-03,
    3.224671290700398e-01,
    2.445134137142996e+00,
    3.754408661907416e+00,
    1.0,
];
/// Below this probability the tail approximation is used
const TAIL_CUTOFF: f64 = 0.02425;

fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Standard normal distribution N(0,1)
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNormal;

impl StandardNormal {
    pub fn new() -> Self {
        StandardNormal
    }

    fn erf(x: f64) -> f64 {
        let t = 1.0 / (1.0 + ERF_P * x.abs());
        let y = 1.0 - horner(&ERF_COEFFS, t) * t * (-x * x).exp();
        y.copysign(x)
    }

    /// Cumulative distribution function
    pub fn cdf(&self, x: f64) -> f64 {
        0.5 * (1.0 + Self::erf(x / std::f64::consts::SQRT_2))
    }

    /// Quantile function. Returns NaN outside (0, 1).
    pub fn inverse_cdf(&self, p: f64) -> f64 {
        if !(p > 0.0 && p < 1.0) {
            return f64::NAN;
        }

        if p < TAIL_CUTOFF {
            let q = (-2.0 * p.ln()).sqrt();
            horner(&TAIL_NUM, q) / horner(&TAIL_DEN, q)
        } else if p <= 1.0 - TAIL_CUTOFF {
            let q = p - 0.5;
            let r = q * q;
            horner(&CENTRAL_NUM, r) * q / horner(&CENTRAL_DEN, r)
        } else {
            -self.inverse_cdf(1.0 - p)
        }
    }

    /// Two-sided z-score for a central interval of the given width, e.g. 0.95 -> 1.96
    pub fn interval_z_score(&self, width: f64) -> f64 {
        self.inverse_cdf((1.0 + width) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_z_scores() {
        let normal = StandardNormal::new();
        assert!((normal.interval_z_score(0.95) - 1.959964).abs() < 1e-4);
        assert!((normal.interval_z_score(0.80) - 1.281552).abs() < 1e-4);
        assert!(normal.inverse_cdf(0.0).is_nan());
    }

    #[test]
    fn test_cdf_inverts_quantile() {
        let normal = StandardNormal::new();
        for p in [0.01, 0.2, 0.5, 0.9, 0.99] {
            assert!((normal.cdf(normal.inverse_cdf(p)) - p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_symmetry() {
        let normal = StandardNormal::new();
        assert!((normal.inverse_cdf(0.995) + normal.inverse_cdf(0.005)).abs() < 1e-12);
        assert!((normal.cdf(0.0) - 0.5).abs() < 1e-9);
    }
}
