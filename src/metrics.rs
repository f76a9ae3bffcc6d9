//! Prometheus metrics: per-request HTTP series plus a handful of counters
//! for logins, provisioning and unique code resolution.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use schoolhub_core::CodeKind;

const REQUEST_DURATION: &str = "schoolhub_http_request_duration_seconds";
const REQUEST_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// `OBSERVABILITY_ENABLED=false` (or `0`) turns off metrics, file logs and
/// trace export. On by default.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true)
    })
}

/// Installs the global recorder. `None` when observability is off or the
/// recorder could not be installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), REQUEST_BUCKETS)
        .and_then(|builder| builder.install_recorder())
        .map_err(|e| tracing::warn!(error = %e, "Prometheus recorder not installed"))
        .ok()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    Some(handle)
}

/// Serves `/metrics` on the separate metrics port.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().to_string();
    // Unmatched requests share one label so stray URLs cannot blow up cardinality.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    gauge!("schoolhub_http_requests_in_flight").increment(1.0);
    let response = next.run(req).await;
    gauge!("schoolhub_http_requests_in_flight").decrement(1.0);

    let status = response.status().as_u16();
    counter!(
        "schoolhub_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "class" => status_class(status)
    )
    .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "route" => route)
        .record(start.elapsed().as_secs_f64());

    response
}

/// Why a login attempt ended the way it did.
#[derive(Debug, Clone, Copy)]
pub enum LoginOutcome {
    Success,
    UnknownEmail,
    WrongPassword,
}

impl LoginOutcome {
    fn as_str(self) -> &'static str {
        match self {
            LoginOutcome::Success => "success",
            LoginOutcome::UnknownEmail => "unknown_email",
            LoginOutcome::WrongPassword => "wrong_password",
        }
    }
}

pub fn track_login(outcome: LoginOutcome) {
    if is_observability_enabled() {
        counter!("schoolhub_logins_total", "outcome" => outcome.as_str()).increment(1);
    }
}

/// A user account was created, either by registration or by provisioning a
/// student or teacher.
pub fn track_user_created(role: &str) {
    if is_observability_enabled() {
        counter!("schoolhub_users_created_total", "role" => role.to_string()).increment(1);
    }
}

/// A generated code was assigned to a new record.
pub fn track_code_generated(kind: CodeKind) {
    if is_observability_enabled() {
        counter!("schoolhub_codes_generated_total", "kind" => kind.as_str()).increment(1);
    }
}

/// A candidate code was already taken and another draw was needed.
pub fn track_code_collision(kind: CodeKind) {
    if is_observability_enabled() {
        counter!("schoolhub_code_collisions_total", "kind" => kind.as_str()).increment(1);
    }
}

pub fn track_code_exhausted(kind: CodeKind) {
    if is_observability_enabled() {
        counter!("schoolhub_code_exhaustions_total", "kind" => kind.as_str()).increment(1);
    }
}
