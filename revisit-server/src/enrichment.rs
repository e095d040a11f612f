//! IP enrichment client
//!
//! Wraps the opaque external geolocation/ISP lookup collaborator. The
//! algorithm behind it is out of scope; this client only shapes the round
//! trip: explicit timeout, status mapping, optional-field deserialization.

use std::net::IpAddr;
use std::time::Duration;

use revisit_common::{Error, Result};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://ip-api.com/json";
const REQUEST_TIMEOUT_SECS: u64 = 4;

/// What the external service tells us about an address. Every field may be
/// absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoInfo {
    pub city: Option<String>,
    pub country: Option<String>,
    pub isp: Option<String>,
}

/// Client for the external IP-enrichment service.
#[derive(Clone)]
pub struct EnrichmentClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl EnrichmentClient {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("http client init failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Look up geo/ISP data for `ip`.
    ///
    /// Loopback and private addresses are never sent out; they resolve to an
    /// empty [`GeoInfo`] immediately.
    pub async fn lookup(&self, ip: IpAddr) -> Result<GeoInfo> {
        if is_unroutable(ip) {
            tracing::debug!(ip = %ip, "Skipping enrichment for unroutable address");
            return Ok(GeoInfo::default());
        }

        let url = format!("{}/{}", self.base_url, ip);
        tracing::debug!(ip = %ip, url = %url, "Querying enrichment service");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("enrichment request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "enrichment service returned {}",
                status
            )));
        }

        let info: GeoInfo = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("enrichment response invalid: {}", e)))?;

        tracing::debug!(
            ip = %ip,
            city = info.city.as_deref().unwrap_or("-"),
            country = info.country.as_deref().unwrap_or("-"),
            "Enrichment lookup complete"
        );

        Ok(info)
    }
}

/// Addresses the external service cannot say anything useful about.
fn is_unroutable(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        IpAddr::V6(v6) => v6.is_loopback(),
    }
}
