//! Enrichment endpoint for the recognized screen
//!
//! Always answers 200: enrichment is best-effort display data, so a failed
//! upstream lookup degrades to absent fields rather than an error status.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use revisit_common::types::EnrichmentInfo;

use crate::AppState;

/// GET /api/fingerprint
///
/// `ip` comes from `X-Forwarded-For` (first hop) when present, else the
/// socket peer. `platform` echoes the request `User-Agent`. City, country
/// and ISP come from the external enrichment service.
pub async fn fingerprint(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Json<EnrichmentInfo> {
    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));

    let platform = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let geo = match ip {
        Some(ip) => match state.enrichment.lookup(ip).await {
            Ok(geo) => geo,
            Err(e) => {
                tracing::warn!(error = %e, "Enrichment lookup failed, returning absent fields");
                Default::default()
            }
        },
        None => Default::default(),
    };

    Json(EnrichmentInfo {
        ip: ip.map(|ip| ip.to_string()),
        city: geo.city,
        country: geo.country,
        isp: geo.isp,
        platform,
    })
}

/// Resolve the client address: forwarded header first, socket peer second.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());

    forwarded.or_else(|| peer.map(|addr| addr.ip()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_header_wins_over_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "93.184.216.34, 10.0.0.1".parse().unwrap());
        let peer: SocketAddr = "127.0.0.1:9999".parse().unwrap();

        let ip = client_ip(&headers, Some(peer)).unwrap();
        assert_eq!(ip.to_string(), "93.184.216.34");
    }

    #[test]
    fn falls_back_to_peer_without_header() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "192.0.2.7:1234".parse().unwrap();

        let ip = client_ip(&headers, Some(peer)).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.7");
    }

    #[test]
    fn unparseable_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "not-an-address".parse().unwrap());
        let peer: SocketAddr = "192.0.2.7:1234".parse().unwrap();

        let ip = client_ip(&headers, Some(peer)).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.7");
    }

    #[test]
    fn no_header_and_no_peer_yields_none() {
        assert!(client_ip(&HeaderMap::new(), None).is_none());
    }
}
