//! [Enphase Enlighten Systems API v2](https://developer.enphase.com/docs) client.

use std::time::Duration;

use async_trait::async_trait;
use bon::bon;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    core::{Endpoint, Interval, StatsSource},
    ops::TimeRange,
    prelude::*,
};

pub struct Api {
    client: Client,
    base_url: Url,
    system_id: String,
    key: String,
    user_id: String,
}

#[bon]
impl Api {
    #[builder]
    pub fn new(
        base_url: Url,
        system_id: String,
        key: String,
        user_id: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url, system_id, key, user_id })
    }
}

impl Api {
    fn build_url(&self, endpoint: Endpoint, window: TimeRange) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("`{}` cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .push("systems")
            .push(&self.system_id)
            .push(endpoint.path());
        url.query_pairs_mut()
            .append_pair("start_at", &window.start.timestamp().to_string())
            .append_pair("end_at", &window.end.timestamp().to_string())
            .append_pair("key", &self.key)
            .append_pair("user_id", &self.user_id);
        Ok(url)
    }
}

#[async_trait]
impl StatsSource for Api {
    #[instrument(skip_all, fields(system_id = %self.system_id, endpoint = %endpoint))]
    async fn get_intervals(&self, endpoint: Endpoint, window: TimeRange) -> Result<Vec<Interval>> {
        let path = endpoint.path();
        let response: StatsResponse = self
            .client
            .get(self.build_url(endpoint, window)?)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to call `{path}`"))?
            .error_for_status()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("`{path}` failed"))?
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to deserialize `{path}` response JSON"))?;
        debug!(n_intervals = response.intervals.len(), "gotcha");
        Ok(response.intervals)
    }
}

impl Endpoint {
    const fn path(self) -> &'static str {
        match self {
            Self::Production => "rgm_stats",
            Self::Consumption => "consumption_stats",
        }
    }
}

/// Body of both `rgm_stats` and `consumption_stats`, the rest of the fields are irrelevant.
#[derive(Deserialize)]
struct StatsResponse {
    intervals: Vec<Interval>,
}
