//! Calendar frequencies and date-range helpers for daily-granular series.

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Time series frequency specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Daily data
    Daily,
    /// Weekly data
    Weekly,
    /// Calendar-monthly data
    Monthly,
    /// Fixed spacing of `n` days
    Days(u32),
}

impl Frequency {
    /// Date `steps` periods after `date`
    pub fn advance(&self, date: NaiveDate, steps: u32) -> Result<NaiveDate> {
        let advanced = match self {
            Frequency::Daily => date.checked_add_signed(Duration::days(i64::from(steps))),
            Frequency::Weekly => date.checked_add_signed(Duration::weeks(i64::from(steps))),
            Frequency::Monthly => date.checked_add_months(Months::new(steps)),
            Frequency::Days(n) => {
                date.checked_add_signed(Duration::days(i64::from(*n) * i64::from(steps)))
            }
        };
        advanced.ok_or_else(|| {
            Error::Computation(format!("date overflow advancing {} by {} {}", date, steps, self))
        })
    }

    /// Infer the frequency from the most common spacing between distinct dates.
    ///
    /// Fewer than two distinct dates fall back to daily.
    pub fn infer(dates: &[NaiveDate]) -> Frequency {
        let mut sorted: Vec<NaiveDate> = dates.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for pair in sorted.windows(2) {
            *counts.entry((pair[1] - pair[0]).num_days()).or_insert(0) += 1;
        }

        // Ties go to the shorter spacing
        let modal = counts
            .into_iter()
            .max_by(|(da, ca), (db, cb)| ca.cmp(cb).then(db.cmp(da)))
            .map(|(days, _)| days);

        match modal {
            None | Some(1) => Frequency::Daily,
            Some(7) => Frequency::Weekly,
            Some(28..=31) => Frequency::Monthly,
            Some(days) => Frequency::Days(days.clamp(1, i64::from(u32::MAX)) as u32),
        }
    }

    /// Get frequency name as string
    pub fn name(&self) -> String {
        match self {
            Frequency::Daily => "D".to_string(),
            Frequency::Weekly => "W".to_string(),
            Frequency::Monthly => "MS".to_string(),
            Frequency::Days(n) => format!("{}D", n),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `periods` dates strictly after `last`, spaced by `frequency`
pub fn date_range_after(
    last: NaiveDate,
    periods: usize,
    frequency: Frequency,
) -> Result<Vec<NaiveDate>> {
    (1..=periods)
        .map(|step| {
            let step = u32::try_from(step)
                .map_err(|_| Error::InvalidInput(format!("too many periods: {}", periods)))?;
            frequency.advance(last, step)
        })
        .collect()
}

/// Days since 1970-01-01, the time origin of the seasonal terms
pub fn days_since_epoch(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_frequency_inference() {
        let daily = vec![d(2022, 1, 1), d(2022, 1, 2), d(2022, 1, 3), d(2022, 1, 5)];
        assert_eq!(Frequency::infer(&daily), Frequency::Daily);

        let weekly = vec![d(2022, 1, 1), d(2022, 1, 8), d(2022, 1, 15)];
        assert_eq!(Frequency::infer(&weekly), Frequency::Weekly);

        let monthly = vec![d(2022, 1, 1), d(2022, 2, 1), d(2022, 3, 1), d(2022, 4, 1)];
        assert_eq!(Frequency::infer(&monthly), Frequency::Monthly);

        let three_days = vec![d(2022, 1, 1), d(2022, 1, 4), d(2022, 1, 7)];
        assert_eq!(Frequency::infer(&three_days), Frequency::Days(3));

        assert_eq!(Frequency::infer(&[d(2022, 1, 1)]), Frequency::Daily);
    }

    #[test]
    fn test_date_range_after() {
        let dates = date_range_after(d(2024, 12, 30), 3, Frequency::Daily).unwrap();
        assert_eq!(dates, vec![d(2024, 12, 31), d(2025, 1, 1), d(2025, 1, 2)]);

        let months = date_range_after(d(2024, 1, 31), 2, Frequency::Monthly).unwrap();
        assert_eq!(months, vec![d(2024, 2, 29), d(2024, 3, 31)]);

        assert!(date_range_after(d(2024, 1, 1), 0, Frequency::Weekly)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_days_since_epoch() {
        assert_eq!(days_since_epoch(d(1970, 1, 2)), 1.0);
        assert_eq!(days_since_epoch(d(1969, 12, 31)), -1.0);
    }
}
