//! Tracing setup and the request logging middleware.
//!
//! With observability on, events go to the console, to daily-rotated files
//! under `LOG_DIR` (errors as text, everything at info as JSON) and, when a
//! collector accepts the pipeline, to an OTLP endpoint.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::trace::TraceError;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config, RandomIdGenerator, Sampler, Tracer};
use opentelemetry_sdk::{Resource, runtime};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};
use uuid::Uuid;

use crate::metrics::is_observability_enabled;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const DEFAULT_LOG_DIR: &str = "storage/logs";
const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";

/// Reuses the caller's `x-request-id` when it is a sane value, otherwise
/// mints one.
fn request_id(req: &Request) -> String {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Wraps each request in a span and logs one completion event whose level
/// follows the response status. The request id is echoed back.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request_id(&req);
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        route = %route,
    );

    let mut response = next.run(req).instrument(span.clone()).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    span.in_scope(|| match status {
        500.. => error!(status, latency_ms, "Request failed"),
        400..=499 => warn!(status, latency_ms, "Request rejected"),
        _ => info!(status, latency_ms, "Request completed"),
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());
        EnvFilter::new(format!(
            "schoolhub={level},schoolhub_core={level},schoolhub_db={level},tower_http=warn,sqlx=warn"
        ))
    })
}

fn init_tracer() -> Result<Tracer, TraceError> {
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| DEFAULT_OTLP_ENDPOINT.to_string());

    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new([
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "deployment.environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(
            Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

fn init_console_only() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_filter(env_filter("info")))
        .init();
}

pub fn init_tracing() {
    if !is_observability_enabled() {
        init_console_only();
        return;
    }

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Cannot create log directory {log_dir}: {e}; logging to console only");
        init_console_only();
        return;
    }

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter("info"));

    let error_layer = fmt::layer()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, &log_dir, "schoolhub-error.log"))
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::new("error"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, &log_dir, "schoolhub.json"))
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(env_filter("info"));

    let registry = tracing_subscriber::registry()
        .with(console_layer)
        .with(error_layer)
        .with(json_layer);

    match init_tracer() {
        Ok(tracer) => {
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .init();
            info!("Tracing initialized with OTLP export");
        }
        Err(e) => {
            registry.init();
            warn!(error = %e, "OTLP export unavailable, tracing to console and files only");
        }
    }
}

pub async fn shutdown_tracer() {
    if is_observability_enabled() {
        info!("Flushing pending traces");
        global::shutdown_tracer_provider();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("x-request-id", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_request_id_reuses_header() {
        assert_eq!(request_id(&request_with(Some("abc-123"))), "abc-123");
    }

    #[test]
    fn test_request_id_generated_when_missing_or_oversized() {
        let generated = request_id(&request_with(None));
        assert!(Uuid::parse_str(&generated).is_ok());

        let long = "x".repeat(200);
        let replaced = request_id(&request_with(Some(&long)));
        assert!(Uuid::parse_str(&replaced).is_ok());
    }
}
