//! Agent network status and the background poller

use crate::api::ServiceClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// One agent in the service's orchestration network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "type")]
    pub agent_type: Option<String>,
}

/// Snapshot of the orchestrator and its agents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentNetworkStatus {
    #[serde(default)]
    pub orchestrator: Option<AgentInfo>,
    #[serde(default)]
    pub agents: BTreeMap<String, AgentInfo>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub pending_requests: u64,
    #[serde(default)]
    pub network: Option<String>,
}

/// Polls `/agents/status` on a fixed interval and publishes the latest
/// snapshot through a watch channel.
///
/// The task's lifetime is explicit: it starts with [`StatusPoller::start`]
/// and stops with [`StatusPoller::stop`] (or when the poller is dropped).
/// Fetch failures keep the previous snapshot; polling is best effort.
pub struct StatusPoller {
    receiver: watch::Receiver<Option<AgentNetworkStatus>>,
    handle: JoinHandle<()>,
}

impl StatusPoller {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    /// Spawn a polling task against the given client
    pub fn start(client: ServiceClient, interval: Duration) -> Self {
        let (sender, receiver) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match client.agent_status().await {
                    Ok(status) => {
                        let _ = sender.send(Some(status));
                    }
                    Err(e) => debug!("Status poll failed: {}", e),
                }
                if sender.is_closed() {
                    break;
                }
            }
        });

        Self { receiver, handle }
    }

    /// The most recent snapshot, if a poll has succeeded yet
    pub fn latest(&self) -> Option<AgentNetworkStatus> {
        self.receiver.borrow().clone()
    }

    /// Wait until the next snapshot arrives
    pub async fn changed(&mut self) -> Option<AgentNetworkStatus> {
        if self.receiver.changed().await.is_err() {
            return None;
        }
        self.receiver.borrow().clone()
    }

    /// Stop the polling task
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
