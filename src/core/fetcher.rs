use std::time::Duration;

use bon::Builder;
use chrono::TimeDelta;
use tokio::time::sleep;

use crate::{
    core::{Endpoint, Interval, StatsSource},
    ops::TimeRange,
    prelude::*,
};

/// Walks a time range window by window, since the source refuses long queries.
#[derive(Builder)]
pub struct Fetcher<S> {
    source: S,

    /// Maximum span of a single query.
    max_window: TimeDelta,

    /// Pause between consecutive queries, the source is rate limited.
    query_delay: Duration,
}

impl<S: StatsSource> Fetcher<S> {
    /// Fetch all the intervals within the range, in order.
    ///
    /// Fails as a whole if any single window fails.
    #[instrument(skip_all, fields(endpoint = %endpoint, range = ?range))]
    pub async fn fetch(&self, endpoint: Endpoint, range: TimeRange) -> Result<Vec<Interval>> {
        ensure!(self.max_window > TimeDelta::zero(), "query window must be positive");

        let mut intervals = Vec::new();
        let mut windows = range.windows(self.max_window).peekable();

        while let Some(window) = windows.next() {
            info!(?window, "querying…");
            let response = self
                .source
                .get_intervals(endpoint, window)
                .await
                .with_context(|| format!("failed to fetch {endpoint} for {window:?}"))?;
            debug!(n_intervals = response.len(), "received");
            intervals.extend(response);

            if let Some(next_window) = windows.peek() {
                let days_to_go = range.with_start(next_window.start).len().num_days();
                info!(days_to_go, delay = ?self.query_delay, "pausing before the next query…");
                sleep(self.query_delay).await;
            }
        }

        info!(n_intervals = intervals.len(), "fetched");
        Ok(intervals)
    }
}
