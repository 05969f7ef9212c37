use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, Utc};
use clap::Parser;
use reqwest::Url;

use crate::{api::enphase, ops::TimeRange, prelude::*};

/// Query the Enphase API for the production and consumption of a solar system within the date
/// range, and compute the average daily export and import to help deciding on a home battery.
#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Found in the URL of your Enlighten system: `/pv/systems/<SYSTEM_ID>/`.
    pub system_id: String,

    /// Developer API key, see <https://developer.enphase.com/docs/quickstart.html>.
    pub key: String,

    /// Found in your API settings at `/pv/settings/<SYSTEM_ID>/`.
    pub user_id: String,

    /// First day of the range, `YYYY-MM-DD`.
    pub start_date: NaiveDate,

    /// Day after the last day of the range, `YYYY-MM-DD`.
    pub end_date: NaiveDate,

    #[clap(
        long = "api-base-url",
        env = "ENPHASE_API_BASE_URL",
        default_value = "https://api.enphaseenergy.com/api/v2"
    )]
    pub api_base_url: Url,

    /// Maximum number of days per API query. The API refuses anything over 7 days.
    #[clap(
        long,
        env = "MAX_DAYS_PER_QUERY",
        default_value = "6",
        value_parser = clap::value_parser!(u32).range(1..=7),
    )]
    pub max_days_per_query: u32,

    /// Delay between consecutive API queries, to stay within the rate limit.
    #[clap(long, env = "QUERY_DELAY", default_value = "30s")]
    pub query_delay: humantime::Duration,

    #[clap(long, env = "REQUEST_TIMEOUT", default_value = "30s")]
    pub request_timeout: humantime::Duration,

    /// Also print the per-day breakdown.
    #[clap(long = "daily", env = "SHOW_DAILY")]
    pub show_daily: bool,
}

impl Args {
    /// Requested range, from the local midnight of the start date until the local midnight of
    /// the end date.
    pub fn range(&self) -> Result<TimeRange> {
        let start = local_midnight(self.start_date)?;
        let end = local_midnight(self.end_date)?;
        ensure!(
            start < end,
            "the end date `{}` must be after the start date `{}`",
            self.end_date,
            self.start_date,
        );
        Ok(TimeRange { start, end })
    }

    #[must_use]
    pub fn max_window(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.max_days_per_query))
    }

    pub fn new_client(&self) -> Result<enphase::Api> {
        enphase::Api::builder()
            .base_url(self.api_base_url.clone())
            .system_id(self.system_id.clone())
            .key(self.key.clone())
            .user_id(self.user_id.clone())
            .timeout(self.request_timeout.into())
            .build()
    }
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .with_context(|| format!("`{date}` has no local midnight"))?;
    Ok(midnight.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::error::ErrorKind;

    use super::*;

    const ARGS: [&str; 6] =
        ["battery-decider", "67", "secret", "4d7a45774e6a41320a", "2024-06-01", "2024-06-11"];

    #[test]
    fn test_parse_ok() -> Result {
        let args = Args::try_parse_from(ARGS)?;
        assert_eq!(args.system_id, "67");
        assert_eq!(args.key, "secret");
        assert_eq!(args.user_id, "4d7a45774e6a41320a");
        assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(args.end_date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        assert_eq!(args.max_window(), TimeDelta::days(6));
        assert_eq!(Duration::from(args.query_delay), Duration::from_secs(30));
        assert!(!args.show_daily);
        Ok(())
    }

    #[test]
    fn test_parse_options_ok() -> Result {
        let args = Args::try_parse_from(
            ARGS.into_iter().chain(["--max-days-per-query", "3", "--query-delay", "1m", "--daily"]),
        )?;
        assert_eq!(args.max_window(), TimeDelta::days(3));
        assert_eq!(Duration::from(args.query_delay), Duration::from_secs(60));
        assert!(args.show_daily);
        Ok(())
    }

    #[test]
    fn test_missing_argument_is_usage_error() {
        let error = Args::try_parse_from(&ARGS[..5]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_malformed_date_fails() {
        let mut args = ARGS;
        args[4] = "2024-13-01";
        let error = Args::try_parse_from(args).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_days_per_query_out_of_bounds_fails() {
        for days in ["0", "8", "4000000000"] {
            let args = ARGS.into_iter().chain(["--max-days-per-query", days]);
            let error = Args::try_parse_from(args).err().unwrap();
            assert_eq!(error.kind(), ErrorKind::ValueValidation, "{days}");
        }
    }

    #[test]
    fn test_days_per_query_upper_bound_ok() -> Result {
        let args = Args::try_parse_from(ARGS.into_iter().chain(["--max-days-per-query", "7"]))?;
        assert_eq!(args.max_window(), TimeDelta::days(7));
        Ok(())
    }

    #[test]
    fn test_range_ok() -> Result {
        let range = Args::try_parse_from(ARGS)?.range()?;
        assert_eq!(
            range.start.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(range.start.with_timezone(&Local).time(), NaiveTime::MIN);
        assert_eq!(range.len().num_days(), 10);
        Ok(())
    }

    #[test]
    fn test_empty_range_fails() -> Result {
        let mut args = ARGS;
        args[5] = args[4];
        let error = Args::try_parse_from(args)?.range().unwrap_err();
        assert!(error.to_string().contains("must be after the start date"), "{error:#}");
        Ok(())
    }
}
