use std::time::Duration;

use chrono::{Months, NaiveDate, NaiveDateTime};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::TelemetryConfig;
use crate::error::TelemetryError;
use crate::models::telemetry::{
    PowerSample,
    SiteDetails,
    SiteDetailsResponse,
    SitePowerResponse,
};

const API_DATE: &str = "%Y-%m-%d";
const API_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_api_date(s: &str) -> Result<NaiveDate, TelemetryError> {
    // lastUpdateTime carries a time part; only the date bounds a request
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, API_DATE).map_err(|_| TelemetryError::InvalidDate(s.to_string()))
}

fn next_month(date: NaiveDate) -> Result<NaiveDate, TelemetryError> {
    date.checked_add_months(Months::new(1))
        .ok_or_else(|| TelemetryError::InvalidDate(date.to_string()))
}

/// Splits the inclusive range `[start, end]` into request windows of one
/// calendar month; the service refuses longer power queries.
///
/// Windows are `[from 00:00, to 00:00)`, the last one closing at `end + 1 day`.
pub fn month_windows(start: NaiveDate, end: NaiveDate) -> Result<Vec<(NaiveDate, NaiveDate)>, TelemetryError> {
    if start > end {
        return Err(TelemetryError::InvalidDate(format!("{start} is after {end}")));
    }
    let stop = end
        .succ_opt()
        .ok_or_else(|| TelemetryError::InvalidDate(end.to_string()))?;
    let last_full_start = stop
        .checked_sub_months(Months::new(1))
        .ok_or_else(|| TelemetryError::InvalidDate(stop.to_string()))?;

    let mut windows = Vec::new();
    let mut from = start;
    while last_full_start > from {
        let to = next_month(from)?;
        windows.push((from, to));
        from = to;
    }
    windows.push((from, stop));
    Ok(windows)
}

/// Reads `power.values` into samples; null readings count as 0 W.
pub fn parse_power_values(body: SitePowerResponse) -> Result<Vec<PowerSample>, TelemetryError> {
    if let Some(unit) = body.power.unit.as_deref().filter(|u| *u != "W") {
        return Err(TelemetryError::InvalidSample(format!("power reported in {unit}, expected W")));
    }
    body.power
        .values
        .into_iter()
        .map(|v| {
            let timestamp = NaiveDateTime::parse_from_str(&v.date, API_DATETIME)
                .map_err(|_| TelemetryError::InvalidSample(v.date.clone()))?;
            Ok(PowerSample::new(timestamp, v.value.unwrap_or(0.0)))
        })
        .collect()
}

/// Client for the SolarEdge monitoring API.
#[derive(Clone, Debug)]
pub struct TelemetryClient {
    http: Client,
    cfg: TelemetryConfig,
}

impl TelemetryClient {
    pub fn new(cfg: TelemetryConfig) -> Result<Self, TelemetryError> {
        if cfg.site_id.is_empty() || cfg.api_key.is_empty() {
            return Err(TelemetryError::NotConfigured);
        }
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/site/{}/{}",
            self.cfg.base_url.trim_end_matches('/'),
            self.cfg.site_id,
            resource
        )
    }

    pub fn details_request(&self) -> RequestBuilder {
        self.http
            .get(self.endpoint("details"))
            .query(&[("api_key", self.cfg.api_key.as_str())])
    }

    pub fn power_request(&self, from: NaiveDate, to: NaiveDate) -> RequestBuilder {
        let start = format!("{} 00:00:00", from.format(API_DATE));
        let end = format!("{} 00:00:00", to.format(API_DATE));
        self.http.get(self.endpoint("power")).query(&[
            ("startTime", start.as_str()),
            ("endTime", end.as_str()),
            ("api_key", self.cfg.api_key.as_str()),
        ])
    }

    /// Sends with retries on transport errors and 5xx answers.
    async fn fetch_json<T, F>(&self, resource: &str, build: F) -> Result<T, TelemetryError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.cfg.max_attempts.max(1);
        let delay = Duration::from_millis(self.cfg.retry_delay_ms);
        let mut attempt = 1;
        loop {
            let outcome = match build().send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.json::<T>().await?);
                }
                Ok(response) => {
                    let status = response.status();
                    let err = TelemetryError::Status {
                        status: status.as_u16(),
                        endpoint: resource.to_string(),
                    };
                    if !status.is_server_error() {
                        return Err(err);
                    }
                    err
                }
                Err(e) => TelemetryError::Http(e),
            };
            if attempt >= attempts {
                return Err(outcome);
            }
            tracing::warn!(resource, attempt, error = %outcome, "telemetry request failed, retrying");
            attempt += 1;
            tokio::time::sleep(delay).await;
        }
    }

    /// Installation date and last update, the site's operating range.
    pub async fn site_details(&self) -> Result<SiteDetails, TelemetryError> {
        let resp: SiteDetailsResponse = self.fetch_json("details", || self.details_request()).await?;
        let details = SiteDetails {
            installation_date: parse_api_date(&resp.details.installation_date)?,
            last_update: parse_api_date(&resp.details.last_update_time)?,
        };
        tracing::info!(
            site = %self.cfg.site_id,
            from = %details.installation_date,
            to = %details.last_update,
            "site active range"
        );
        Ok(details)
    }

    /// Power samples for every day in `[start, end]`, ordered by time.
    pub async fn power_samples(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PowerSample>, TelemetryError> {
        let mut samples = Vec::new();
        for (from, to) in month_windows(start, end)? {
            let resp: SitePowerResponse = self.fetch_json("power", || self.power_request(from, to)).await?;
            let chunk = parse_power_values(resp)?;
            tracing::debug!(%from, %to, samples = chunk.len(), "power window fetched");
            samples.extend(chunk);
        }
        // adjacent windows share their midnight boundary
        samples.sort_by_key(|s| s.timestamp);
        samples.dedup_by_key(|s| s.timestamp);
        tracing::info!(%start, %end, samples = samples.len(), "power history retrieved");
        Ok(samples)
    }

    /// Everything between installation and the last update.
    pub async fn full_history(&self) -> Result<Vec<PowerSample>, TelemetryError> {
        let details = self.site_details().await?;
        self.power_samples(details.installation_date, details.last_update).await
    }
}
