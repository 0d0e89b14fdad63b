use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tracing::warn;

use crate::web::handlers::ErrorResponse;

/// Expired windows are swept once per this many checks.
const PRUNE_EVERY: u64 = 256;

/// Fixed-window request budget per client IP.
#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, Window>>,
    checks: Arc<AtomicU64>,
    max_requests: u32,
    window_seconds: i64,
}

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started_at: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            checks: Arc::new(AtomicU64::new(0)),
            max_requests,
            window_seconds,
        }
    }

    /// Count one request from `ip`; false once the window's budget is spent.
    pub fn check(&self, ip: &str, now: DateTime<Utc>) -> bool {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            self.prune(now);
        }

        let mut entry = self.store.entry(ip.to_string()).or_insert_with(|| Window {
            count: 0,
            started_at: now,
        });
        let window = entry.value_mut();

        if self.expired(window, now) {
            window.count = 0;
            window.started_at = now;
        }

        window.count += 1;
        window.count <= self.max_requests
    }

    /// Forget clients whose window has run out.
    pub fn prune(&self, now: DateTime<Utc>) {
        self.store.retain(|_, window| !self.expired(window, now));
    }

    fn expired(&self, window: &Window, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(window.started_at) >= Duration::seconds(self.window_seconds)
    }
}

pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();

    if !rate_limit.check(&ip, Utc::now()) {
        warn!(%ip, "run rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "Too many research runs; try again in a minute.".to_string(),
            }),
        )
            .into_response();
    }

    next.run(req).await
}
