//! Prometheus metrics middleware and business counters.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS_HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> =
    OnceLock::new();

/// Middleware that records `http_requests_total` and
/// `http_request_duration_seconds` per method/path/status.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_to_str(req.method());
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

fn method_to_str(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Count a completed registration and the number of event memberships it
/// created.
pub fn record_registration_completed(event_count: usize) {
    counter!("registrations_completed_total").increment(1);
    counter!("event_memberships_created_total").increment(event_count as u64);
}

/// Count an issued OTP by purpose.
pub fn record_otp_issued(purpose: &str) {
    counter!("otp_issued_total", "purpose" => purpose.to_string()).increment(1);
}

/// Count a rejected registration by reason (duplicate, team_full, closed...).
pub fn record_registration_rejected(reason: &'static str) {
    counter!("registrations_rejected_total", "reason" => reason).increment(1);
}

/// Handler for /metrics that renders Prometheus text format.
pub async fn metrics_handler() -> impl IntoResponse {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        let output = handle.render();
        (
            axum::http::StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            output,
        )
    } else {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            [(axum::http::header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        )
    }
}

/// Install the global Prometheus recorder. Call once at startup, before any
/// metric is recorded. Safe to call again (later calls are ignored), which
/// keeps parallel test setups from panicking.
pub fn init_metrics() {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let builder = PrometheusBuilder::new().set_buckets(&[
        0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0,
    ]);

    let handle = match builder {
        Ok(builder) => match builder.install_recorder() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Prometheus recorder already installed: {}", e);
                return;
            }
        },
        Err(e) => {
            tracing::error!("Invalid histogram buckets: {}", e);
            return;
        }
    };

    let _ = PROMETHEUS_HANDLE.set(handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_to_str() {
        assert_eq!(method_to_str(&Method::GET), "GET");
        assert_eq!(method_to_str(&Method::POST), "POST");
        assert_eq!(method_to_str(&Method::PUT), "PUT");
        assert_eq!(method_to_str(&Method::TRACE), "OTHER");
    }
}
