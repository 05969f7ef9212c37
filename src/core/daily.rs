use std::{mem::take, ops::AddAssign};

use chrono::{DateTime, TimeDelta, Utc};

use crate::prelude::*;

impl<T> SumDaily for T where T: ?Sized {}

pub trait SumDaily {
    /// Sum time-ordered `(end_at, value)` points into consecutive 24-hour buckets since `start`.
    ///
    /// A point is never split: its entire value goes to the bucket whose boundary its end time
    /// reaches, so a bucket can only close on a point edge. A point reaching over several
    /// boundaries closes all of them, and the skipped buckets come out empty. Points after the
    /// last reached boundary do not make a complete day and are dropped.
    #[must_use]
    fn sum_daily<V>(self, start: DateTime<Utc>) -> Vec<V>
    where
        Self: Sized + IntoIterator<Item = (DateTime<Utc>, V)>,
        V: Default + AddAssign,
    {
        let mut daily = Vec::new();
        let mut accumulator = V::default();
        let mut next_boundary = start + TimeDelta::days(1);

        for (end_at, value) in self {
            accumulator += value;
            while end_at >= next_boundary {
                daily.push(take(&mut accumulator));
                next_boundary += TimeDelta::days(1);
            }
        }

        debug!(n_days = daily.len(), "summed");
        daily
    }
}

#[cfg(test)]
mod tests {
    use std::iter::successors;

    use itertools::Itertools;

    use super::*;
    use crate::{
        core::{Interval, merge},
        quantity::energy::WattHours,
    };

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_717_200_000, 0).unwrap()
    }

    /// Quarter-hourly end timestamps covering the given number of days.
    fn quarters(n_days: i64) -> Vec<DateTime<Utc>> {
        let end = start() + TimeDelta::days(n_days);
        successors(Some(start() + TimeDelta::minutes(15)), |end_at| {
            Some(*end_at + TimeDelta::minutes(15))
        })
        .take_while(|end_at| *end_at <= end)
        .collect()
    }

    #[test]
    fn test_sum_daily_conserves_energy() {
        let intervals = quarters(3)
            .into_iter()
            .enumerate()
            .map(|(index, end_at)| Interval::produced(end_at, i64::try_from(index % 7).unwrap()))
            .collect_vec();

        let daily = intervals
            .iter()
            .map(|interval| (interval.end_at, interval.production))
            .sum_daily(start());

        assert_eq!(daily.len(), 3);
        assert_eq!(
            daily.iter().copied().sum::<WattHours>(),
            intervals.iter().map(|interval| interval.production).sum::<WattHours>(),
        );
    }

    #[test]
    fn test_sum_daily_boundary_belongs_to_closing_day() {
        let points = [
            (start() + TimeDelta::hours(12), 1),
            (start() + TimeDelta::days(1), 2),
            (start() + TimeDelta::days(1) + TimeDelta::minutes(15), 4),
            (start() + TimeDelta::days(2), 8),
        ];
        assert_eq!(points.sum_daily(start()), [3, 12]);
    }

    #[test]
    fn test_sum_daily_does_not_split_straddling_interval() {
        // The second point covers 22:00–02:00 and goes entirely to the second day:
        let points = [
            (start() + TimeDelta::hours(22), 10),
            (start() + TimeDelta::hours(26), 40),
            (start() + TimeDelta::days(2), 5),
        ];
        assert_eq!(points.sum_daily(start()), [10 + 40, 5]);
    }

    #[test]
    fn test_sum_daily_gap_emits_empty_days() {
        let points = [(start() + TimeDelta::days(1), 7), (start() + TimeDelta::days(3), 9)];
        assert_eq!(points.sum_daily(start()), [7, 9, 0]);
    }

    #[test]
    fn test_sum_daily_drops_incomplete_last_day() {
        let points = [
            (start() + TimeDelta::days(1), 7),
            (start() + TimeDelta::days(1) + TimeDelta::hours(6), 9),
        ];
        assert_eq!(points.sum_daily(start()), [7]);
    }

    #[test]
    fn test_sum_daily_empty() {
        let points: [(DateTime<Utc>, i64); 0] = [];
        assert!(points.sum_daily(start()).is_empty());
    }

    #[test]
    fn test_net_is_imported_minus_exported() -> Result {
        let end_ats = quarters(2);
        let production = (0_i64..)
            .zip(&end_ats)
            .map(|(index, end_at)| Interval::produced(*end_at, index * 37 % 101))
            .collect_vec();
        let consumption = (0_i64..)
            .zip(&end_ats)
            .map(|(index, end_at)| Interval::consumed(*end_at, index * 53 % 89))
            .collect_vec();
        let intervals = merge(production, consumption)?;

        let sum_daily = |extract: fn(&Interval) -> WattHours| {
            intervals.iter().map(|interval| (interval.end_at, extract(interval))).sum_daily(start())
        };
        let net = sum_daily(Interval::net);
        let exported = sum_daily(Interval::exported);
        let imported = sum_daily(Interval::imported);

        assert_eq!(net.len(), 2);
        // Surplus and deficit intervals occur within the same day:
        assert!(exported.iter().all(|exported| *exported > WattHours::ZERO));
        assert!(imported.iter().all(|imported| *imported > WattHours::ZERO));
        for ((net, exported), imported) in net.into_iter().zip(exported).zip(imported) {
            assert_eq!(net, imported - exported);
        }
        Ok(())
    }
}
