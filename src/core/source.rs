use async_trait::async_trait;

use crate::{core::Interval, ops::TimeRange, prelude::*};

#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Endpoint {
    #[display("production")]
    Production,

    #[display("consumption")]
    Consumption,
}

/// Remote statistics limited to a single query window.
#[async_trait]
pub trait StatsSource: Sync {
    /// Fetch the time-ordered intervals of the endpoint within the window.
    async fn get_intervals(&self, endpoint: Endpoint, window: TimeRange) -> Result<Vec<Interval>>;
}
