//! In-memory `Fetch` used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use seetest_cloud::{classify, Fetch, Method, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One request seen by [`RecordingFetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Serves canned `(status, body)` responses keyed by method and path, and
/// records every request. Unknown routes answer 404 with an empty body.
#[derive(Clone, Default)]
pub struct RecordingFetch {
    routes: Arc<RwLock<HashMap<(Method, String), (u16, String)>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl RecordingFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.routes
            .write()
            .await
            .insert((method, path.to_string()), (status, body.into()));
    }

    pub async fn ok(&self, method: Method, path: &str, body: impl Into<String>) {
        self.respond(method, path, 200, body).await;
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.read().await.last().cloned()
    }
}

#[async_trait]
impl Fetch for RecordingFetch {
    async fn fetch(
        &self,
        path: &str,
        method: Method,
        params: &[(String, String)],
    ) -> Result<String> {
        self.requests.write().await.push(RecordedRequest {
            method,
            path: path.to_string(),
            params: params.to_vec(),
        });

        let (status, body) = self
            .routes
            .read()
            .await
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(classify(path, status, body)?)
    }
}

pub const INVENTORY: &str = r#"{
    "status": "SUCCESS",
    "data": [
        {"id": 1, "deviceName": "A", "deviceOs": "Android", "osVersion": "14",
         "displayStatus": "available", "currentStatus": "online",
         "agentLocation": "Bangalore", "model": "Pixel 7", "udid": "R58M123"},
        {"id": 2, "deviceName": "B", "deviceOs": "iOS", "osVersion": "17.2",
         "displayStatus": "available", "currentStatus": "online",
         "agentLocation": "Austin", "model": "iPhone 14", "udid": "00008030-001A"},
        {"id": 3, "deviceName": "C", "deviceOs": "iOS", "osVersion": "16.5",
         "displayStatus": "in use", "currentStatus": "online",
         "agentLocation": "Austin", "model": "iPad", "udid": "00008101-77BC"},
        {"id": 4, "deviceName": "D", "deviceOs": "Android", "osVersion": "13",
         "displayStatus": "offline", "currentStatus": "offline",
         "agentLocation": "Bangalore", "model": "Galaxy S22", "udid": null}
    ]
}"#;
