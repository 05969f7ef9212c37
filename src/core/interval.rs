use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{prelude::*, quantity::energy::WattHours};

/// Energy reported for one time bucket.
///
/// The production endpoint only fills in [`Interval::production`], the consumption endpoint only
/// fills in [`Interval::consumption`]. [`merge`] combines the two into complete intervals.
#[must_use]
#[serde_as]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Interval {
    /// Inclusive end of the bucket.
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    pub end_at: DateTime<Utc>,

    #[serde(rename = "wh_del", default)]
    pub production: WattHours,

    #[serde(rename = "enwh", default)]
    pub consumption: WattHours,
}

impl Interval {
    /// Consumption minus production.
    pub fn net(&self) -> WattHours {
        self.consumption - self.production
    }

    /// Production in excess of the simultaneous consumption.
    pub fn exported(&self) -> WattHours {
        (self.production - self.consumption).positive_part()
    }

    /// Consumption in excess of the simultaneous production.
    pub fn imported(&self) -> WattHours {
        self.net().positive_part()
    }
}

/// Pair the production and consumption intervals by index.
///
/// Both sequences must describe the very same buckets: equal lengths and equal end timestamps.
/// Anything else would silently attribute energy to the wrong bucket, so it is an error.
#[instrument(skip_all, fields(n_production = production.len(), n_consumption = consumption.len()))]
pub fn merge(production: Vec<Interval>, consumption: Vec<Interval>) -> Result<Vec<Interval>> {
    ensure!(
        production.len() == consumption.len(),
        "production and consumption are misaligned: {} vs {} intervals",
        production.len(),
        consumption.len(),
    );
    production
        .into_iter()
        .zip(consumption)
        .enumerate()
        .map(|(index, (production, consumption))| {
            ensure!(
                production.end_at == consumption.end_at,
                "interval #{index} is misaligned: production ends at {}, consumption ends at {}",
                production.end_at,
                consumption.end_at,
            );
            Ok(Interval {
                end_at: production.end_at,
                production: production.production,
                consumption: consumption.consumption,
            })
        })
        .collect()
}

#[cfg(test)]
impl Interval {
    pub fn produced(end_at: DateTime<Utc>, watt_hours: i64) -> Self {
        Self { end_at, production: WattHours(watt_hours), consumption: WattHours::ZERO }
    }

    pub fn consumed(end_at: DateTime<Utc>, watt_hours: i64) -> Self {
        Self { end_at, production: WattHours::ZERO, consumption: WattHours(watt_hours) }
    }
}
