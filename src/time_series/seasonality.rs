//! Fourier-series seasonal terms.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Whether a seasonality is included in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalitySetting {
    /// Decide from the span and spacing of the history
    Auto,
    /// Include with the default Fourier order
    Enabled,
    /// Leave out
    Disabled,
    /// Include with an explicit Fourier order
    Order(usize),
}

impl Default for SeasonalitySetting {
    fn default() -> Self {
        SeasonalitySetting::Auto
    }
}

impl SeasonalitySetting {
    /// Resolve to a Fourier order, `None` when the seasonality is off
    pub fn resolve(&self, auto_enabled: bool, default_order: usize) -> Option<usize> {
        match self {
            SeasonalitySetting::Auto if auto_enabled => Some(default_order),
            SeasonalitySetting::Auto => None,
            SeasonalitySetting::Enabled => Some(default_order),
            SeasonalitySetting::Disabled => None,
            SeasonalitySetting::Order(0) => None,
            SeasonalitySetting::Order(order) => Some(*order),
        }
    }
}

/// One periodic component of the model
#[derive(Debug, Clone, PartialEq)]
pub struct Seasonality {
    /// Component name, also the forecast column name
    pub name: String,
    /// Period in days
    pub period: f64,
    /// Number of sine/cosine pairs
    pub fourier_order: usize,
    /// Standard deviation of the Gaussian prior on the coefficients
    pub prior_scale: f64,
}

impl Seasonality {
    pub fn new(
        name: impl Into<String>,
        period: f64,
        fourier_order: usize,
        prior_scale: f64,
    ) -> Self {
        Self {
            name: name.into(),
            period,
            fourier_order,
            prior_scale,
        }
    }

    /// Number of regression columns this seasonality contributes
    pub fn width(&self) -> usize {
        2 * self.fourier_order
    }

    /// Fourier features at `days` (days since the epoch):
    /// `sin(2πkt/P), cos(2πkt/P)` for `k = 1..=order`
    pub fn features(&self, days: f64) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        for k in 1..=self.fourier_order {
            let angle = 2.0 * PI * k as f64 * days / self.period;
            row.push(angle.sin());
            row.push(angle.cos());
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(SeasonalitySetting::Auto.resolve(true, 10), Some(10));
        assert_eq!(SeasonalitySetting::Auto.resolve(false, 10), None);
        assert_eq!(SeasonalitySetting::Enabled.resolve(false, 3), Some(3));
        assert_eq!(SeasonalitySetting::Disabled.resolve(true, 3), None);
        assert_eq!(SeasonalitySetting::Order(5).resolve(false, 3), Some(5));
        assert_eq!(SeasonalitySetting::Order(0).resolve(true, 3), None);
    }

    #[test]
    fn test_features_are_periodic() {
        let weekly = Seasonality::new("weekly", 7.0, 3, 10.0);
        let a = weekly.features(3.0);
        let b = weekly.features(10.0);
        assert_eq!(a.len(), 6);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
    }
}
