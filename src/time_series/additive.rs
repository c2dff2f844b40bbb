//! Additive trend + seasonality forecasting model.
//!
//! The series is modelled as
//!
//! ```text
//! y(t) = g(t) + s_yearly(t) + s_weekly(t) + s_daily(t) + e(t)
//! ```
//!
//! where `g` is a piecewise-linear trend whose slope may change at a set of
//! changepoints spread over the early part of the history, and each `s` is a
//! truncated Fourier series. Coefficients are the MAP estimate under Gaussian
//! priors; the prior scales control how flexible the trend and seasonal terms are.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::stats::{inverse_diagonal, solve_linear_system, StandardNormal};
use crate::time_series::core::{date_range_after, days_since_epoch, Frequency};
use crate::time_series::forecasting::{
    calculate_forecast_metrics, Forecast, ForecastMetrics, Forecaster,
};
use crate::time_series::seasonality::{Seasonality, SeasonalitySetting};

pub const YEARLY_PERIOD: f64 = 365.25;
pub const WEEKLY_PERIOD: f64 = 7.0;
pub const DAILY_PERIOD: f64 = 1.0;

const YEARLY_ORDER: usize = 10;
const WEEKLY_ORDER: usize = 3;
const DAILY_ORDER: usize = 4;

/// Prior scale of the base intercept and slope
const TREND_PRIOR_SCALE: f64 = 5.0;
/// Rounds of noise-variance re-estimation
const NOISE_ITERATIONS: usize = 10;
/// Smallest residual degrees of freedom used when estimating the noise variance
const MIN_RESIDUAL_DOF: f64 = 1.0;
/// Floor of the scaled noise variance; keeps the normal equations well posed
const MIN_NOISE_VARIANCE: f64 = 1e-6;

/// Model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditiveModelConfig {
    pub yearly_seasonality: SeasonalitySetting,
    pub weekly_seasonality: SeasonalitySetting,
    pub daily_seasonality: SeasonalitySetting,
    /// Number of potential trend changepoints
    pub n_changepoints: usize,
    /// Fraction of the history in which changepoints are placed
    pub changepoint_range: f64,
    /// Prior scale of the slope changes
    pub changepoint_prior_scale: f64,
    /// Prior scale of the Fourier coefficients
    pub seasonality_prior_scale: f64,
    /// Width of the uncertainty interval
    pub interval_width: f64,
}

impl Default for AdditiveModelConfig {
    fn default() -> Self {
        Self {
            yearly_seasonality: SeasonalitySetting::Auto,
            weekly_seasonality: SeasonalitySetting::Auto,
            daily_seasonality: SeasonalitySetting::Auto,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.80,
        }
    }
}

impl AdditiveModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(Error::InvalidInput(format!(
                "interval_width must be in (0, 1), got {}",
                self.interval_width
            )));
        }
        if !(self.changepoint_prior_scale > 0.0) || !(self.seasonality_prior_scale > 0.0) {
            return Err(Error::InvalidInput(
                "prior scales must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything learned by `fit`
#[derive(Debug, Clone)]
struct FittedState {
    start: NaiveDate,
    /// History span in days
    t_scale: f64,
    y_scale: f64,
    /// Sorted distinct dates of the input, including rows without a value
    history_dates: Vec<NaiveDate>,
    /// Rows used for fitting, sorted by date
    history: Vec<(NaiveDate, f64)>,
    changepoints: Vec<NaiveDate>,
    changepoints_t: Vec<f64>,
    seasonalities: Vec<Seasonality>,
    /// `[intercept, slope, deltas.., fourier..]` in scaled units
    beta: Vec<f64>,
    /// Noise variance in scaled units
    sigma2: f64,
}

impl FittedState {
    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.t_scale
    }

    fn seasonal_offset(&self) -> usize {
        2 + self.changepoints_t.len()
    }

    fn trend(&self, t: f64) -> f64 {
        let deltas = &self.beta[2..self.seasonal_offset()];
        let bends: f64 = self
            .changepoints_t
            .iter()
            .zip(deltas)
            .map(|(c, delta)| delta * (t - c).max(0.0))
            .sum();
        self.beta[0] + self.beta[1] * t + bends
    }

    /// Contribution of seasonality `index` at `date`, scaled units
    fn seasonal(&self, index: usize, date: NaiveDate) -> f64 {
        let mut offset = self.seasonal_offset();
        for seasonality in &self.seasonalities[..index] {
            offset += seasonality.width();
        }
        let seasonality = &self.seasonalities[index];
        seasonality
            .features(days_since_epoch(date))
            .iter()
            .zip(&self.beta[offset..offset + seasonality.width()])
            .map(|(x, b)| x * b)
            .sum()
    }

    /// Variance of future slope changes at scaled time `t`
    fn trend_variance(&self, t: f64) -> f64 {
        if t <= 1.0 || self.changepoints_t.is_empty() {
            return 0.0;
        }
        let deltas = &self.beta[2..self.seasonal_offset()];
        let rate = self.changepoints_t.len() as f64;
        let laplace_scale = deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64;
        rate * 2.0 * laplace_scale.powi(2) * (t - 1.0).powi(3) / 3.0
    }

    fn design_row(&self, date: NaiveDate) -> Vec<f64> {
        let t = self.scaled_time(date);
        let mut row = Vec::with_capacity(self.beta.len());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints_t.iter().map(|c| (t - c).max(0.0)));
        let days = days_since_epoch(date);
        for seasonality in &self.seasonalities {
            row.extend(seasonality.features(days));
        }
        row
    }
}

/// Additive trend + seasonality forecaster
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    config: AdditiveModelConfig,
    state: Option<FittedState>,
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self::new(AdditiveModelConfig::default())
    }
}

impl AdditiveModel {
    /// Create an unfitted model
    pub fn new(config: AdditiveModelConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &AdditiveModelConfig {
        &self.config
    }

    fn state(&self) -> Result<&FittedState> {
        self.state
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation("Model has not been fitted yet".to_string()))
    }

    /// Trend changepoint dates chosen during fitting
    pub fn changepoints(&self) -> Result<&[NaiveDate]> {
        Ok(&self.state()?.changepoints)
    }

    /// Seasonalities active after fitting
    pub fn seasonalities(&self) -> Result<&[Seasonality]> {
        Ok(&self.state()?.seasonalities)
    }

    /// Residual standard deviation of the fit, in the units of `y`
    pub fn noise_std(&self) -> Result<f64> {
        let state = self.state()?;
        Ok(state.sigma2.sqrt() * state.y_scale)
    }

    /// Fit from parallel date/value slices. Rows without a value are not fitted
    /// but still count as history dates.
    pub fn fit_series(
        &mut self,
        dates: &[Option<NaiveDate>],
        values: &[Option<f64>],
    ) -> Result<()> {
        if self.state.is_some() {
            return Err(Error::InvalidOperation(
                "AdditiveModel can only be fit once; create a new instance".to_string(),
            ));
        }
        self.config.validate()?;

        if dates.len() != values.len() {
            return Err(Error::InconsistentRowCount {
                expected: dates.len(),
                found: values.len(),
            });
        }

        let mut history_dates = Vec::with_capacity(dates.len());
        let mut history = Vec::with_capacity(dates.len());
        for (date, value) in dates.iter().zip(values) {
            let date =
                date.ok_or_else(|| Error::InvalidInput("Found null in column ds".to_string()))?;
            history_dates.push(date);
            if let Some(y) = value.filter(|y| y.is_finite()) {
                history.push((date, y));
            }
        }
        history_dates.sort_unstable();
        history_dates.dedup();
        history.sort_by_key(|(date, _)| *date);

        if history.len() < 2 {
            return Err(Error::InsufficientData(
                "Dataframe has less than 2 non-null rows".to_string(),
            ));
        }

        let start = history[0].0;
        let end = history[history.len() - 1].0;
        let span_days = (end - start).num_days();
        if span_days == 0 {
            return Err(Error::InsufficientData(
                "history covers a single date; at least two distinct dates are needed".to_string(),
            ));
        }

        let y_scale = history
            .iter()
            .map(|(_, y)| y.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale == 0.0 { 1.0 } else { y_scale };

        let (changepoints, changepoints_t) =
            self.place_changepoints(&history, start, span_days as f64);
        let seasonalities = self.resolve_seasonalities(&history, span_days);

        let mut state = FittedState {
            start,
            t_scale: span_days as f64,
            y_scale,
            history_dates,
            history,
            changepoints,
            changepoints_t,
            seasonalities,
            beta: Vec::new(),
            sigma2: 0.0,
        };

        let (beta, sigma2) = self.solve(&state)?;
        state.beta = beta;
        state.sigma2 = sigma2;

        log::info!(
            "fitted additive model on {} rows: {} changepoints, seasonalities [{}], noise sd {:.4}",
            state.history.len(),
            state.changepoints.len(),
            state
                .seasonalities
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            state.sigma2.sqrt() * state.y_scale
        );

        self.state = Some(state);
        Ok(())
    }

    /// Changepoints at evenly spaced history rows within `changepoint_range`
    fn place_changepoints(
        &self,
        history: &[(NaiveDate, f64)],
        start: NaiveDate,
        t_scale: f64,
    ) -> (Vec<NaiveDate>, Vec<f64>) {
        let hist_size = (history.len() as f64 * self.config.changepoint_range).floor() as usize;
        let n_changepoints = self.config.n_changepoints.min(hist_size.saturating_sub(1));
        if n_changepoints == 0 {
            return (Vec::new(), Vec::new());
        }

        let step = (hist_size - 1) as f64 / n_changepoints as f64;
        let dates: Vec<NaiveDate> = (1..=n_changepoints)
            .map(|i| history[(i as f64 * step).round() as usize].0)
            .collect();
        let scaled = dates
            .iter()
            .map(|d| (*d - start).num_days() as f64 / t_scale)
            .collect();
        (dates, scaled)
    }

    /// Active seasonalities. A period longer than the history gets its prior
    /// scale shrunk by `span / period`, so it cannot stand in for the trend.
    fn resolve_seasonalities(
        &self,
        history: &[(NaiveDate, f64)],
        span_days: i64,
    ) -> Vec<Seasonality> {
        let min_spacing = history
            .windows(2)
            .map(|pair| (pair[1].0 - pair[0].0).num_days())
            .filter(|days| *days > 0)
            .min()
            .unwrap_or(span_days);

        let candidates = [
            (
                "yearly",
                self.config.yearly_seasonality,
                span_days >= 730,
                YEARLY_PERIOD,
                YEARLY_ORDER,
            ),
            (
                "weekly",
                self.config.weekly_seasonality,
                span_days >= 14 && min_spacing < 7,
                WEEKLY_PERIOD,
                WEEKLY_ORDER,
            ),
            (
                "daily",
                self.config.daily_seasonality,
                span_days >= 2 && min_spacing < 1,
                DAILY_PERIOD,
                DAILY_ORDER,
            ),
        ];

        let mut seasonalities = Vec::new();
        for (name, setting, auto_enabled, period, default_order) in candidates {
            match setting.resolve(auto_enabled, default_order) {
                Some(order) => {
                    let coverage = (span_days as f64 / period).min(1.0);
                    let prior = self.config.seasonality_prior_scale * coverage;
                    seasonalities.push(Seasonality::new(name, period, order, prior));
                }
                None if setting == SeasonalitySetting::Auto => log::info!(
                    "Disabling {} seasonality; enable it explicitly to override",
                    name
                ),
                None => {}
            }
        }
        seasonalities
    }

    /// MAP coefficients and noise variance for the design in `state`.
    ///
    /// The noise variance is the residual sum of squares over the residual
    /// degrees of freedom `n - tr(H)`, where `H` is the ridge hat matrix.
    fn solve(&self, state: &FittedState) -> Result<(Vec<f64>, f64)> {
        let rows: Vec<Vec<f64>> = state
            .history
            .iter()
            .map(|(d, _)| state.design_row(*d))
            .collect();
        let targets: Vec<f64> = state.history.iter().map(|(_, y)| y / state.y_scale).collect();
        let n = rows.len() as f64;
        let p = rows[0].len();

        let mut prior_scales = vec![TREND_PRIOR_SCALE; 2];
        prior_scales.extend(vec![self.config.changepoint_prior_scale; state.changepoints_t.len()]);
        for seasonality in &state.seasonalities {
            prior_scales.extend(vec![seasonality.prior_scale; seasonality.width()]);
        }

        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (row, y) in rows.iter().zip(&targets) {
            for i in 0..p {
                xty[i] += row[i] * y;
                for j in i..p {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }
        for i in 0..p {
            for j in 0..i {
                xtx[i][j] = xtx[j][i];
            }
        }

        let mean = targets.iter().sum::<f64>() / n;
        let mut sigma2 = (targets.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / n)
            .max(MIN_NOISE_VARIANCE);
        let mut beta = vec![0.0; p];

        for _ in 0..NOISE_ITERATIONS {
            let penalties: Vec<f64> = prior_scales.iter().map(|s| sigma2 / s.powi(2)).collect();
            let mut system = xtx.clone();
            for (i, penalty) in penalties.iter().enumerate() {
                system[i][i] += penalty;
            }
            beta = solve_linear_system(&system, &xty)?;

            // tr(H) = p - sum(penalty_i * inv(system)_ii)
            let shrunk: f64 = inverse_diagonal(&system)?
                .iter()
                .zip(&penalties)
                .map(|(inv, penalty)| inv * penalty)
                .sum();
            let residual_dof = (n - (p as f64 - shrunk)).max(MIN_RESIDUAL_DOF);

            let rss: f64 = rows
                .iter()
                .zip(&targets)
                .map(|(row, y)| {
                    let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
                    (y - fitted).powi(2)
                })
                .sum();
            sigma2 = (rss / residual_dof).max(MIN_NOISE_VARIANCE);
        }

        Ok((beta, sigma2))
    }

    /// History dates followed by `periods` dates after the last one.
    ///
    /// `frequency` defaults to the spacing inferred from the history.
    pub fn make_future_dataframe(
        &self,
        periods: usize,
        frequency: Option<Frequency>,
        include_history: bool,
    ) -> Result<Vec<NaiveDate>> {
        let state = self.state()?;
        let frequency = frequency.unwrap_or_else(|| Frequency::infer(&state.history_dates));
        let last = *state
            .history_dates
            .last()
            .ok_or_else(|| Error::InsufficientData("model has no history".to_string()))?;

        let mut dates = if include_history {
            state.history_dates.clone()
        } else {
            Vec::with_capacity(periods)
        };
        dates.extend(date_range_after(last, periods, frequency)?);
        Ok(dates)
    }

    /// Evaluate one seasonal component over arbitrary dates
    pub fn seasonal_profile(&self, name: &str, dates: &[NaiveDate]) -> Result<Vec<f64>> {
        let state = self.state()?;
        let index = state
            .seasonalities
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| Error::InvalidInput(format!("no seasonality named '{}'", name)))?;
        Ok(dates
            .iter()
            .map(|d| state.seasonal(index, *d) * state.y_scale)
            .collect())
    }
}

impl Forecaster for AdditiveModel {
    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        let dates = frame
            .column("ds")?
            .as_dates()
            .ok_or_else(|| {
                Error::Type(format!(
                    "column ds must hold dates, found {}",
                    frame.column_type("ds").map_or("unknown".to_string(), |t| t.to_string())
                ))
            })?
            .to_vec();
        let values = frame.column("y")?.to_f64_values()?;
        self.fit_series(&dates, &values)
    }

    fn predict(&self, dates: &[NaiveDate]) -> Result<Forecast> {
        let state = self.state()?;
        let z = StandardNormal::new().interval_z_score(self.config.interval_width);

        let mut trend = Vec::with_capacity(dates.len());
        let mut yhat = Vec::with_capacity(dates.len());
        let mut yhat_lower = Vec::with_capacity(dates.len());
        let mut yhat_upper = Vec::with_capacity(dates.len());
        let mut additive_terms = Vec::with_capacity(dates.len());
        let mut seasonal: Vec<(String, Vec<f64>)> = state
            .seasonalities
            .iter()
            .map(|s| (s.name.clone(), Vec::with_capacity(dates.len())))
            .collect();

        for date in dates {
            let t = state.scaled_time(*date);
            let trend_value = state.trend(t) * state.y_scale;

            let mut terms = 0.0;
            for (index, (_, values)) in seasonal.iter_mut().enumerate() {
                let value = state.seasonal(index, *date) * state.y_scale;
                values.push(value);
                terms += value;
            }

            let point = trend_value + terms;
            let sd = (state.sigma2 + state.trend_variance(t)).sqrt() * state.y_scale;

            trend.push(trend_value);
            additive_terms.push(terms);
            yhat.push(point);
            yhat_lower.push(point - z * sd);
            yhat_upper.push(point + z * sd);
        }

        Ok(Forecast {
            ds: dates.to_vec(),
            trend,
            yhat_lower,
            yhat_upper,
            seasonal,
            additive_terms,
            yhat,
            interval_width: self.config.interval_width,
        })
    }

    fn name(&self) -> &str {
        "AdditiveModel"
    }

    fn fit_metrics(&self) -> Result<ForecastMetrics> {
        let state = self.state()?;
        let dates: Vec<NaiveDate> = state.history.iter().map(|(d, _)| *d).collect();
        let actual: Vec<f64> = state.history.iter().map(|(_, y)| *y).collect();
        let forecast = self.predict(&dates)?;
        calculate_forecast_metrics(&actual, &forecast.yhat)
    }
}
