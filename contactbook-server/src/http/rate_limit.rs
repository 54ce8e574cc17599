//! Fixed-window request throttling backed by Redis
//!
//! One counter per `(route, client)` pair. Each hit runs `SET NX EX` and
//! `INCR` in a single `MULTI`, so a counter never exists without its TTL.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use redis::aio::ConnectionManager;

use super::error::ApiError;
use crate::config::RedisSettings;
use crate::state::AppState;

/// Quota for one route
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    pub route: &'static str,
    pub times: u64,
    pub window: Duration,
}

/// Redis-backed limiter; a disabled limiter admits everything
#[derive(Clone)]
pub struct RateLimiter {
    conn: Option<ConnectionManager>,
}

impl RateLimiter {
    /// Connect to the store. Fails if Redis is unreachable.
    pub async fn connect(settings: &RedisSettings) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(settings.url())?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!(host = %settings.host, port = settings.port, "Rate limiter connected");
        Ok(Self { conn: Some(conn) })
    }

    pub fn disabled() -> Self {
        Self { conn: None }
    }

    /// Count one request for `client`. Returns `false` once the quota for
    /// the current window is used up.
    pub async fn hit(&self, throttle: Throttle, client: &str) -> Result<bool, redis::RedisError> {
        let Some(conn) = &self.conn else {
            return Ok(true);
        };
        let mut conn = conn.clone();
        let key = window_key(throttle.route, client);

        let (count,): (u64,) = window_hit(&key, throttle.window)
            .query_async(&mut conn)
            .await?;

        Ok(count <= throttle.times)
    }
}

/// Open the window with its TTL if absent, then count the hit.
fn window_hit(key: &str, window: Duration) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(key)
        .arg(0)
        .arg("EX")
        .arg(window.as_secs().max(1))
        .arg("NX")
        .ignore()
        .incr(key, 1);
    pipe
}

fn window_key(route: &str, client: &str) -> String {
    format!("rate:{}:{}", route, client)
}

/// Client identity: first `X-Forwarded-For` entry, else the peer address.
pub fn client_id(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(addr) = forwarded {
        return addr.to_owned();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Middleware for `from_fn_with_state((state, throttle), rate_limit)`.
pub async fn rate_limit(
    State((state, throttle)): State<(Arc<AppState>, Throttle)>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_id(&request);

    if !state.limiter.hit(throttle, &client).await? {
        tracing::warn!(route = throttle.route, client = %client, "Rate limit exceeded");
        return Err(ApiError::TooManyRequests);
    }

    Ok(next.run(request).await)
}
