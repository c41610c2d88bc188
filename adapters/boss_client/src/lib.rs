#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! HTTP client adapter for the shared community boss counter.
//!
//! The remote counter is a fire-and-forget side channel: local combat never
//! waits on it, and an unreachable service degrades to an `Unavailable`
//! readout instead of an error surfaced to the player.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use thiserror::Error;
use tokio::time::timeout;

/// Default request deadline applied to every remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Payload posted to the attack endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
struct BossAttackRequest {
    amount: u32,
}

/// Status document returned by the boss counter service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BossStatusResponse {
    #[serde(rename = "type")]
    kind: String,
    #[allow(dead_code)]
    boss_id: String,
    hp: u32,
    max_hp: u32,
}

/// Acknowledgement returned after an attack has been applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BossAttackResponse {
    #[serde(rename = "type")]
    kind: String,
    #[allow(dead_code)]
    boss_id: String,
    hp: u32,
    max_hp: u32,
    #[allow(dead_code)]
    amount: u32,
}

/// Snapshot of the community boss as far as this client knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossReadout {
    /// The service answered; the counter currently holds these values.
    Available {
        /// Remaining hit points of the shared boss.
        hp: u32,
        /// Hit point ceiling of the shared boss.
        max_hp: u32,
    },
    /// The service could not be reached or answered with garbage.
    Unavailable,
}

impl BossReadout {
    /// Reports whether the shared boss is down to zero hit points.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        matches!(self, Self::Available { hp: 0, .. })
    }
}

impl fmt::Display for BossReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { hp, max_hp } => write!(f, "community boss {hp}/{max_hp}"),
            Self::Unavailable => write!(f, "community boss unavailable"),
        }
    }
}

#[derive(Debug, Error)]
enum ClientError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("unexpected response document of type {0:?}")]
    UnexpectedDocument(String),
}

/// Client for the remote community boss counter.
#[derive(Debug, Clone)]
pub struct RemoteBoss {
    client: reqwest::Client,
    base_url: String,
    deadline: Duration,
}

impl RemoteBoss {
    /// Creates a client targeting the provided service base URL.
    ///
    /// The base URL carries no trailing slash; endpoint paths are appended
    /// verbatim.
    #[must_use]
    pub fn new<T>(base_url: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            deadline: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Fetches the current shared boss counter.
    ///
    /// Failures are logged and collapse to [`BossReadout::Unavailable`].
    pub async fn status(&self) -> BossReadout {
        match self.fetch_status().await {
            Ok(readout) => readout,
            Err(error) => {
                warn!("boss status fetch failed: {error}");
                BossReadout::Unavailable
            }
        }
    }

    /// Applies an attack to the shared counter and reports the new readout.
    ///
    /// The service clamps the amount on its side; callers pass whatever their
    /// local hit was worth.
    pub async fn attack(&self, amount: u32) -> BossReadout {
        match self.post_attack(amount).await {
            Ok(readout) => readout,
            Err(error) => {
                warn!("boss attack post failed: {error}");
                BossReadout::Unavailable
            }
        }
    }

    /// Fires an attack without waiting for the acknowledgement.
    ///
    /// Local combat resolution never blocks on the network; the spawned task
    /// logs the eventual readout and drops it.
    pub fn attack_and_forget(&self, amount: u32) {
        let client = self.clone();
        drop(tokio::spawn(async move {
            let readout = client.attack(amount).await;
            debug!("deferred boss attack resolved: {readout}");
        }));
    }

    async fn fetch_status(&self) -> Result<BossReadout, ClientError> {
        let url = format!("{}/api/boss/status", self.base_url);
        debug!("fetching boss status from {url}");

        let response = timeout(self.deadline, self.client.get(&url).send())
            .await
            .map_err(|_| ClientError::Timeout(self.deadline))??;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let document: BossStatusResponse = response.json().await?;
        if document.kind != "boss_status" {
            return Err(ClientError::UnexpectedDocument(document.kind));
        }

        Ok(BossReadout::Available {
            hp: document.hp,
            max_hp: document.max_hp,
        })
    }

    async fn post_attack(&self, amount: u32) -> Result<BossReadout, ClientError> {
        let url = format!("{}/api/boss/attack", self.base_url);
        debug!("posting boss attack of {amount} to {url}");

        let request = self
            .client
            .post(&url)
            .json(&BossAttackRequest { amount })
            .send();
        let response = timeout(self.deadline, request)
            .await
            .map_err(|_| ClientError::Timeout(self.deadline))??;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let document: BossAttackResponse = response.json().await?;
        if document.kind != "boss_attack" {
            return Err(ClientError::UnexpectedDocument(document.kind));
        }

        Ok(BossReadout::Available {
            hp: document.hp,
            max_hp: document.max_hp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_display_covers_both_states() {
        let available = BossReadout::Available { hp: 640, max_hp: 1000 };
        assert_eq!(available.to_string(), "community boss 640/1000");
        assert_eq!(
            BossReadout::Unavailable.to_string(),
            "community boss unavailable"
        );
    }

    #[test]
    fn defeat_requires_an_answer_from_the_service() {
        assert!(BossReadout::Available { hp: 0, max_hp: 1000 }.is_defeated());
        assert!(!BossReadout::Available { hp: 1, max_hp: 1000 }.is_defeated());
        assert!(!BossReadout::Unavailable.is_defeated());
    }

    #[test]
    fn status_document_parses_the_service_shape() {
        let raw = r#"{"type":"boss_status","bossId":"global-boss-1","hp":940,"maxHp":1000}"#;
        let document: BossStatusResponse =
            serde_json::from_str(raw).expect("well-formed status document");

        assert_eq!(document.kind, "boss_status");
        assert_eq!(document.hp, 940);
        assert_eq!(document.max_hp, 1000);
    }

    #[test]
    fn attack_document_parses_the_service_shape() {
        let raw = r#"{"type":"boss_attack","bossId":"global-boss-1","hp":930,"maxHp":1000,"amount":10}"#;
        let document: BossAttackResponse =
            serde_json::from_str(raw).expect("well-formed attack document");

        assert_eq!(document.kind, "boss_attack");
        assert_eq!(document.hp, 930);
        assert_eq!(document.amount, 10);
    }

    #[test]
    fn attack_request_serializes_the_amount() {
        let body = serde_json::to_string(&BossAttackRequest { amount: 25 })
            .expect("request body serializes");
        assert_eq!(body, r#"{"amount":25}"#);
    }
}
