//! Random slowdown middleware for testing
#![allow(dead_code)] // Feature-gated middleware

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use rand_distr::{Distribution, Normal};

/// Middleware that slows down the request for a random amount of time drawn
/// from a gaussian, to shake out client assumptions about response latency.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let normal = Normal::new(1000.0, 2000.0).unwrap();
    let millis = 0.0f64.max(normal.sample(&mut rand::rng()));

    tokio::time::sleep(std::time::Duration::from_millis(millis as u64)).await;
    next.run(request).await
}
