//! Liveness probe for the UI server itself. Does not contact the inference backend.

pub async fn health() -> &'static str {
    "ok"
}
