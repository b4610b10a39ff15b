//! Requester metadata extractor used by the audit trail.

use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::models::login_log::Requester;

/// Client address and user agent of the current request.
///
/// The address is the first `X-Forwarded-For` hop when a proxy supplied one,
/// otherwise the socket peer. Both are `None` when unavailable, which is
/// never a reason to reject the request.
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = forwarded_for(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Ok(Requester {
            ip_address,
            user_agent,
        })
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Requester {
        let (mut parts, _) = request.into_parts();
        Requester::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn prefers_first_forwarded_hop() {
        let request = Request::builder()
            .header("X-Forwarded-For", "10.0.0.7, 172.16.0.1")
            .header(header::USER_AGENT, "kiosk/1.0")
            .body(())
            .unwrap();
        let requester = extract(request).await;
        assert_eq!(requester.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(requester.user_agent.as_deref(), Some("kiosk/1.0"));
    }

    #[tokio::test]
    async fn falls_back_to_socket_peer() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 4], 5555))));
        let requester = extract(request).await;
        assert_eq!(requester.ip_address.as_deref(), Some("192.168.1.4"));
        assert_eq!(requester.user_agent, None);
    }
}
