//! GET /health-check: liveness probe.

/// Always answers `200 OK` with the body `OK`.
pub async fn health_check() -> &'static str {
    "OK"
}
