//! Chart rendering using Plotters
//!
//! Every chart is drawn by a function generic over the drawing backend; the
//! public entry points pick `BitMapBackend` or `SVGBackend` from
//! [`PlotSettings::output_type`] and write straight to a file.

use std::path::Path;

use ::plotters::coord::Shift;
use ::plotters::prelude::*;
use chrono::{Duration, NaiveDate};

use crate::core::error::{Error, Result};
use crate::time_series::core::days_since_epoch;
use crate::time_series::{AdditiveModel, Forecast};
use crate::vis::config::{OutputType, PlotSettings};

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Plot the raw sales series as a line chart
pub fn plot_sales_trend<P: AsRef<Path>>(
    dates: &[NaiveDate],
    values: &[f64],
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    if dates.len() != values.len() {
        return Err(Error::InconsistentRowCount {
            expected: dates.len(),
            found: values.len(),
        });
    }

    match settings.output_type {
        OutputType::PNG => {
            let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
                .into_drawing_area();
            draw_sales_trend(&root, dates, values, settings)
        }
        OutputType::SVG => {
            let root = SVGBackend::new(path.as_ref(), (settings.width, settings.height))
                .into_drawing_area();
            draw_sales_trend(&root, dates, values, settings)
        }
    }
}

/// Plot observed points, the forecast line and its uncertainty band
pub fn plot_forecast<P: AsRef<Path>>(
    history: &[(NaiveDate, f64)],
    forecast: &Forecast,
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    match settings.output_type {
        OutputType::PNG => {
            let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
                .into_drawing_area();
            draw_forecast(&root, history, forecast, settings)
        }
        OutputType::SVG => {
            let root = SVGBackend::new(path.as_ref(), (settings.width, settings.height))
                .into_drawing_area();
            draw_forecast(&root, history, forecast, settings)
        }
    }
}

/// Plot one panel per model component: trend, then yearly and weekly seasonality
/// when the model has them
pub fn plot_components<P: AsRef<Path>>(
    model: &AdditiveModel,
    forecast: &Forecast,
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    let panels = component_panels(forecast);
    // Each panel gets the configured height
    let height = settings.height.saturating_mul(panels.len() as u32).max(settings.height);

    match settings.output_type {
        OutputType::PNG => {
            let root =
                BitMapBackend::new(path.as_ref(), (settings.width, height)).into_drawing_area();
            draw_components(&root, &panels, model, forecast, settings)
        }
        OutputType::SVG => {
            let root = SVGBackend::new(path.as_ref(), (settings.width, height)).into_drawing_area();
            draw_components(&root, &panels, model, forecast, settings)
        }
    }
}

fn draw_sales_trend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dates: &[NaiveDate],
    values: &[f64],
    settings: &PlotSettings,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x: Vec<f64> = dates.iter().map(|d| days_since_epoch(*d)).collect();
    let (x_min, x_max) = padded_range(x.iter().copied())?;
    let (y_min, y_max) = padded_range(values.iter().copied())?;

    let mut chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(settings.x_label.as_str())
        .y_desc(settings.y_label.as_str())
        .x_label_formatter(&format_day);
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let color = rgb(settings.color(0));
    let series = chart.draw_series(LineSeries::new(
        x.iter().copied().zip(values.iter().copied()),
        &color,
    ))?;

    if settings.show_legend {
        series
            .label(settings.y_label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn draw_forecast<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    history: &[(NaiveDate, f64)],
    forecast: &Forecast,
    settings: &PlotSettings,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let history_x: Vec<f64> = history.iter().map(|(d, _)| days_since_epoch(*d)).collect();
    let forecast_x: Vec<f64> = forecast.ds.iter().map(|d| days_since_epoch(*d)).collect();

    let (x_min, x_max) = padded_range(history_x.iter().chain(&forecast_x).copied())?;
    let (y_min, y_max) = padded_range(
        history
            .iter()
            .map(|(_, y)| *y)
            .chain(forecast.yhat_lower.iter().copied())
            .chain(forecast.yhat_upper.iter().copied()),
    )?;

    let mut chart = ChartBuilder::on(root)
        .caption(&settings.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(settings.x_label.as_str())
        .y_desc(settings.y_label.as_str())
        .x_label_formatter(&format_day);
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let color = rgb(settings.color(0));

    // Band: upper edge left to right, then lower edge back
    let band: Vec<(f64, f64)> = forecast_x
        .iter()
        .copied()
        .zip(forecast.yhat_upper.iter().copied())
        .chain(
            forecast_x
                .iter()
                .copied()
                .zip(forecast.yhat_lower.iter().copied())
                .rev(),
        )
        .collect();
    let band_series =
        chart.draw_series(std::iter::once(Polygon::new(band, color.mix(0.2).filled())))?;
    if settings.show_legend {
        band_series
            .label(format!("{:.0}% interval", forecast.interval_width * 100.0))
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.mix(0.2).filled())
            });
    }

    let line_series = chart.draw_series(LineSeries::new(
        forecast_x.iter().copied().zip(forecast.yhat.iter().copied()),
        &color,
    ))?;
    if settings.show_legend {
        line_series
            .label("yhat")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    let point_series = chart.draw_series(
        history_x
            .iter()
            .zip(history)
            .map(|(&x, (_, y))| Circle::new((x, *y), 2, BLACK.filled())),
    )?;
    if settings.show_legend {
        point_series
            .label("observed")
            .legend(|(x, y)| Circle::new((x + 10, y), 2, BLACK.filled()));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Panels drawn by the components chart, in order
fn component_panels(forecast: &Forecast) -> Vec<String> {
    let mut panels = vec!["trend".to_string()];
    for name in forecast.component_names() {
        match name {
            "yearly" | "weekly" => panels.push(name.to_string()),
            other => log::debug!("no component panel for {} seasonality", other),
        }
    }
    panels
}

fn draw_components<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panels: &[String],
    model: &AdditiveModel,
    forecast: &Forecast,
    settings: &PlotSettings,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let titled = root.titled(&settings.title, ("sans-serif", 30).into_font())?;
    let areas = titled.split_evenly((panels.len(), 1));

    for (index, (area, panel)) in areas.iter().zip(panels).enumerate() {
        let color = rgb(settings.color(index));
        match panel.as_str() {
            "trend" => {
                let x: Vec<f64> = forecast.ds.iter().map(|d| days_since_epoch(*d)).collect();
                let range = padded_range(x.iter().copied())?;
                draw_panel(
                    area,
                    "trend",
                    &x,
                    &forecast.trend,
                    range,
                    &format_day,
                    color,
                    settings,
                )?;
            }
            "yearly" => {
                let dates = representative_year();
                let x: Vec<f64> = dates.iter().map(|d| days_since_epoch(*d)).collect();
                let y = model.seasonal_profile("yearly", &dates)?;
                let range = (x[0], x[x.len() - 1]);
                draw_panel(
                    area,
                    "yearly",
                    &x,
                    &y,
                    range,
                    &format_month_day,
                    color,
                    settings,
                )?;
            }
            "weekly" => {
                let dates = representative_week();
                let x: Vec<f64> = (0..dates.len()).map(|i| i as f64).collect();
                let y = model.seasonal_profile("weekly", &dates)?;
                draw_panel(
                    area,
                    "weekly",
                    &x,
                    &y,
                    (-0.5, 6.5),
                    &format_weekday,
                    color,
                    settings,
                )?;
            }
            _ => {}
        }
    }

    root.present()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    name: &str,
    x: &[f64],
    y: &[f64],
    x_range: (f64, f64),
    x_formatter: &dyn Fn(&f64) -> String,
    color: RGBColor,
    settings: &PlotSettings,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (y_min, y_max) = padded_range(y.iter().copied())?;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(name).x_label_formatter(x_formatter);
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    chart.draw_series(LineSeries::new(
        x.iter().copied().zip(y.iter().copied()),
        &color,
    ))?;
    if x.len() <= WEEKDAYS.len() {
        chart.draw_series(
            x.iter()
                .zip(y)
                .map(|(&x, &y)| Circle::new((x, y), 3, color.filled())),
        )?;
    }
    Ok(())
}

/// Min and max of the finite values, widened by 5% on each side
fn padded_range(values: impl Iterator<Item = f64>) -> Result<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return Err(Error::InvalidInput("no finite values to plot".to_string()));
    }
    let span = if max > min { max - min } else { 1.0 };
    Ok((min - span * 0.05, max + span * 0.05))
}

fn rgb(color: (u8, u8, u8)) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn date_from_days(days: f64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days.round() as i64))
}

fn format_day(x: &f64) -> String {
    date_from_days(*x).map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string())
}

fn format_month_day(x: &f64) -> String {
    date_from_days(*x).map_or_else(String::new, |d| d.format("%B %-d").to_string())
}

fn format_weekday(x: &f64) -> String {
    let index = x.round();
    if (0.0..7.0).contains(&index) && (x - index).abs() < 1e-6 {
        WEEKDAYS[index as usize].to_string()
    } else {
        String::new()
    }
}

/// Every day of a non-leap year starting on a Sunday
fn representative_year() -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or(NaiveDate::MIN);
    (0..365).map(|i| start + Duration::days(i)).collect()
}

/// Sunday through Saturday
fn representative_week() -> Vec<NaiveDate> {
    representative_year().into_iter().take(7).collect()
}
