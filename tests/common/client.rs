//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest and
//! provides methods for all survey-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::REQUEST_TIMEOUT_SECS;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("POST request failed")
    }

    async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    // ========================================================================
    // Participant Endpoints
    // ========================================================================

    pub async fn current_song(&self) -> Response {
        self.get("/api/current-song").await
    }

    pub async fn submit(&self, body: &Value) -> Response {
        self.post_json("/api/submit", body).await
    }

    /// Submits a mood plus the given emotions for `song_id`, not advancing.
    pub async fn submit_simple(
        &self,
        participant_id: &str,
        song_id: i64,
        mood: &str,
        emotions: &[&str],
    ) -> Response {
        self.submit(&json!({
            "participant_id": participant_id,
            "song_id": song_id,
            "current_mood": mood,
            "selected_emotions": emotions,
        }))
        .await
    }

    // ========================================================================
    // Admin Endpoints
    // ========================================================================

    pub async fn admin_current_song(&self) -> Response {
        self.get("/api/admin/current-song").await
    }

    pub async fn admin_songs(&self) -> Response {
        self.get("/api/admin/songs").await
    }

    pub async fn next_song(&self) -> Response {
        self.post("/api/admin/next-song").await
    }

    pub async fn prev_song(&self) -> Response {
        self.post("/api/admin/prev-song").await
    }

    pub async fn set_song(&self, index: &Value) -> Response {
        self.post_json("/api/admin/set-song", &json!({ "index": index }))
            .await
    }

    pub async fn responses(&self, limit: Option<i64>) -> Response {
        let path = match limit {
            Some(limit) => format!("/api/admin/responses?limit={}", limit),
            None => "/api/admin/responses".to_string(),
        };
        self.get(&path).await
    }

    pub async fn participants(&self) -> Response {
        self.get("/api/admin/participants").await
    }

    pub async fn participant(&self, participant_id: &str) -> Response {
        self.get(&format!("/api/admin/participant/{}", participant_id))
            .await
    }

    pub async fn summary(&self) -> Response {
        self.get("/api/admin/summary").await
    }
}
