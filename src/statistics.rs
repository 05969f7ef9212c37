mod average;

use chrono::{DateTime, TimeDelta, Utc};

pub use self::average::RoundedMean;
use crate::{
    core::{Interval, SumDaily, merge},
    prelude::*,
    quantity::energy::WattHours,
};

/// Per-day energy totals, the i-th item of every series belongs to the i-th day since start.
#[must_use]
pub struct DailyEnergy {
    pub start: DateTime<Utc>,
    pub production: Vec<WattHours>,
    pub consumption: Vec<WattHours>,

    /// Daily consumption minus daily production.
    pub net: Vec<WattHours>,

    /// Daily sum of the per-interval production surplus.
    pub exported: Vec<WattHours>,

    /// Daily sum of the per-interval production deficit.
    pub imported: Vec<WattHours>,
}

impl DailyEnergy {
    #[instrument(skip_all, fields(start = %start))]
    pub fn try_new(
        start: DateTime<Utc>,
        production: Vec<Interval>,
        consumption: Vec<Interval>,
    ) -> Result<Self> {
        info!("crunching numbers…");
        let intervals = merge(production, consumption)?;
        let sum_daily = |extract: fn(&Interval) -> WattHours| {
            intervals.iter().map(|interval| (interval.end_at, extract(interval))).sum_daily(start)
        };

        let production = sum_daily(|interval| interval.production);
        let consumption = sum_daily(|interval| interval.consumption);
        let net = consumption
            .iter()
            .zip(&production)
            .map(|(consumption, production)| *consumption - *production)
            .collect();
        let this = Self {
            start,
            net,
            exported: sum_daily(Interval::exported),
            imported: sum_daily(Interval::imported),
            production,
            consumption,
        };

        let incomplete = incomplete_tail(start, &intervals, this.n_days())?;
        if let (Some(first), Some(last)) = (incomplete.first(), incomplete.last()) {
            warn!(
                n_intervals = incomplete.len(),
                since = %first.end_at,
                until = %last.end_at,
                "dropping the incomplete last day"
            );
        }
        info!(n_days = this.n_days(), "done");
        Ok(this)
    }

    #[must_use]
    pub const fn n_days(&self) -> usize {
        self.production.len()
    }

    pub fn averages(&self) -> Result<Averages> {
        ensure!(!self.production.is_empty(), "there is no complete day of data to average");
        Ok(Averages {
            n_days: self.n_days(),
            production: self.production.iter().copied().rounded_mean()?,
            consumption: self.consumption.iter().copied().rounded_mean()?,
            net: self.net.iter().copied().rounded_mean()?,
            exported: self.exported.iter().copied().rounded_mean()?,
            imported: self.imported.iter().copied().rounded_mean()?,
        })
    }
}

/// Trailing intervals which came after the last closed day.
fn incomplete_tail(
    start: DateTime<Utc>,
    intervals: &[Interval],
    n_days: usize,
) -> Result<&[Interval]> {
    if n_days == 0 {
        return Ok(intervals);
    }
    let last_boundary = start + TimeDelta::days(i64::try_from(n_days)?);
    let n_closed = intervals.partition_point(|interval| interval.end_at < last_boundary) + 1;
    Ok(intervals.get(n_closed..).unwrap_or_default())
}

/// Average daily energy.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Averages {
    pub n_days: usize,
    pub production: WattHours,
    pub consumption: WattHours,
    pub net: WattHours,
    pub exported: WattHours,
    pub imported: WattHours,
}
