//! Cross-cutting middleware applied to every RPC route, outer to inner:
//! tracing span, rate-limit admission, metrics recorder, handler body.
//! The chain is assembled once at router construction and never mutated.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{Instrument, info_span};

use crate::api::error::ApiError;
use crate::metrics::ServiceMetrics;

/// Token-bucket admission gate with a fixed requests-per-second ceiling,
/// shared by every route. The bucket state is updated atomically, so
/// concurrent admission checks cannot lose updates.
pub struct RateGate {
    limiter: DefaultDirectRateLimiter,
}

impl RateGate {
    /// Fails if `qps` is zero; admission control with no capacity would
    /// reject every call.
    pub fn new(qps: u32) -> anyhow::Result<Self> {
        let qps = NonZeroU32::new(qps).ok_or_else(|| anyhow::anyhow!("qps ceiling must be > 0"))?;
        Ok(Self {
            limiter: RateLimiter::direct(Quota::per_second(qps)),
        })
    }

    /// True if the call may proceed.
    pub fn admit(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

/// Operation name for spans and metric labels: the matched route pattern
/// when available, the raw path otherwise.
fn operation_name(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| format!("{} {}", request.method(), path.as_str()))
        .unwrap_or_else(|| format!("{} {}", request.method(), request.uri().path()))
}

/// Outermost stage: one span per call, tagged with the outcome and
/// duration. Failures are recorded on the span, never suppressed.
pub async fn trace_calls(request: Request, next: Next) -> Response {
    let operation = operation_name(&request);
    let span = info_span!(
        "rpc_call",
        operation = %operation,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
        success = tracing::field::Empty,
    );

    async move {
        let started = Instant::now();
        let response = next.run(request).await;
        let elapsed = started.elapsed();

        let span = tracing::Span::current();
        span.record("status", response.status().as_u16());
        span.record("duration_ms", elapsed.as_millis() as u64);
        span.record("success", !response.status().is_server_error());
        response
    }
    .instrument(span)
    .await
}

/// Admission stage: rejects with `RateLimited` before the handler body or
/// the storage layer is ever invoked.
pub async fn admit_call(
    State(gate): State<Arc<RateGate>>,
    request: Request,
    next: Next,
) -> Response {
    if !gate.admit() {
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}

/// Innermost stage: per-operation counter and latency histogram, recorded
/// for every outcome including rejections bubbling up from the handler.
pub async fn record_call(
    State(metrics): State<Arc<ServiceMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let operation = operation_name(&request);
    let started = Instant::now();
    let response = next.run(request).await;
    metrics.observe(
        &operation,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_rejects_once_ceiling_is_exhausted() {
        let gate = RateGate::new(3).unwrap();
        assert!(gate.admit());
        assert!(gate.admit());
        assert!(gate.admit());
        assert!(!gate.admit());
    }

    #[test]
    fn zero_ceiling_is_rejected_at_construction() {
        assert!(RateGate::new(0).is_err());
    }
}
