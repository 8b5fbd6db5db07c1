use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::debug;

use super::{ApiError, AppState};
use crate::services::RateDecision;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Admits or throttles every request before it reaches a handler.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_identity(&req, &state.shared.config.server.trusted_proxy_ips);

    match state.shared.rate_limiter.check(&client) {
        RateDecision::Allow => next.run(req).await,
        RateDecision::Reject { retry_after } => {
            debug!(client = %client, "Request throttled");
            metrics::counter!("rate_limit_rejections_total").increment(1);
            ApiError::Throttled { retry_after }.into_response()
        }
    }
}

/// The socket peer address, or the first `X-Forwarded-For` hop when the peer
/// is a trusted proxy.
fn client_identity(req: &Request, trusted_proxies: &[String]) -> String {
    let Some(peer) = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
    else {
        return "unknown".to_string();
    };

    if is_trusted(peer, trusted_proxies)
        && let Some(forwarded) = forwarded_client(req)
    {
        return forwarded;
    }

    peer.to_string()
}

fn is_trusted(peer: IpAddr, trusted_proxies: &[String]) -> bool {
    trusted_proxies
        .iter()
        .filter_map(|p| p.trim().parse::<IpAddr>().ok())
        .any(|p| p == peer)
}

fn forwarded_client(req: &Request) -> Option<String> {
    req.headers()
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|hop| !hop.is_empty())
        .map(ToString::to_string)
}
