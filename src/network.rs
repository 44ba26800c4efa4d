use crate::errors::{ClientError, OrError};
use crate::types::{Endpoint, Line, Region, RunNumber};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One point-in-time read of a region's vehicle state, keyed line → run.
/// Vehicle data stays opaque; nothing here validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub network: HashMap<Line, HashMap<RunNumber, Value>>,
    pub time_stamp: u64,
}

impl NetworkSnapshot {
    /// Flattens the snapshot into its (line, run) pairs.
    /// Iteration order is unspecified.
    pub fn vehicles(&self) -> Vec<(Line, RunNumber)> {
        self.network
            .iter()
            .flat_map(|(line, runs)| runs.keys().map(move |run| (*line, *run)))
            .collect()
    }

    pub fn vehicle_count(&self) -> usize {
        self.network.values().map(HashMap::len).sum()
    }
}

/// Body of one per-vehicle position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRequest {
    pub line: Line,
    pub run: RunNumber,
}

/// Request/response client for the vehicle API of one region.
pub struct NetworkClient {
    api: Endpoint,
    region: Region,
    client: reqwest::Client,
}

impl NetworkClient {
    pub fn new(api: Endpoint, region: Region) -> OrError<NetworkClient> {
        if !api.is_api() {
            return Err(ClientError::invalid_configuration(format!(
                "API endpoint must use http:// or https://, got {}",
                api
            )));
        }
        Ok(NetworkClient {
            api,
            region,
            client: reqwest::Client::new(),
        })
    }

    fn vehicles_url(&self, suffix: &str) -> String {
        format!(
            "{}/vehicles/{}/{}",
            self.api.as_str().trim_end_matches('/'),
            self.region,
            suffix
        )
    }

    /// Fetches the current snapshot with one blocking request.
    pub async fn fetch_snapshot(&self) -> OrError<NetworkSnapshot> {
        let url = self.vehicles_url("all");
        let response = self.client.get(&url).send().await.map_err(|e| {
            ClientError::request(&url, format!("snapshot request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(ClientError::request(
                &url,
                format!("HTTP {}", response.status()),
            ));
        }

        let snapshot: NetworkSnapshot = response.json().await.map_err(|e| {
            ClientError::request(&url, format!("snapshot parse failed: {}", e))
        })?;
        Ok(snapshot)
    }

    /// Issues one position request and returns the raw response body.
    /// The status is not inspected here; callers judge the body.
    pub async fn dispatch_position(&self, line: Line, run: RunNumber) -> OrError<String> {
        let url = self.vehicles_url("position");
        let request = PositionRequest { line, run };
        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            ClientError::request(
                &url,
                format!("position dispatch failed for line {} run {}: {}", line, run, e),
            )
        })?;
        response.text().await.map_err(|e| {
            ClientError::request(
                &url,
                format!("position response read failed for line {} run {}: {}", line, run, e),
            )
        })
    }

    /// One linear pass: fetch the snapshot once, then dispatch one position
    /// request per (line, run) pair, sequentially. Every pair is dispatched
    /// unconditionally; a non-empty response body is noteworthy and gets
    /// printed. A failure aborts all remaining dispatches.
    ///
    /// Returns the number of dispatches issued.
    pub async fn poll_and_dispatch(&self) -> OrError<usize> {
        let snapshot = self.fetch_snapshot().await?;
        let vehicles = snapshot.vehicles();
        println!(
            "NetworkClient: region {} snapshot holds {} vehicles (time_stamp {})",
            self.region,
            vehicles.len(),
            snapshot.time_stamp
        );

        let mut dispatched = 0;
        for (line, run) in vehicles {
            let body = self.dispatch_position(line, run).await?;
            if !body.is_empty() {
                println!("NetworkClient: line {} run {}: {}", line, run, body);
            }
            dispatched += 1;
        }
        Ok(dispatched)
    }
}
