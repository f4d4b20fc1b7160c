//! One-shot idle-time check for state left behind by the legacy add-on.
//!
//! If the legacy peer reports device info, the units are loaded right away
//! so the migration logic can run without waiting for a user event.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lazyshot_core::{LegacyPeerReply, LegacyPeerRequest, PeerReplyKind};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{MessagingError, ProbeError};
use crate::host::{IdleScheduler, RuntimeMessenger};
use crate::sequencer::BootstrapSequencer;

/// How a probe run ended.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// Legacy state was found and the units loaded.
    MigrationStarted,
    /// The peer answered but had nothing to migrate.
    NothingToMigrate,
    /// No legacy peer is installed.
    PeerAbsent,
    /// The probe failed. Already logged.
    Failed(ProbeError),
    /// The probe had already run in this process.
    AlreadyRan,
}

/// Asks the legacy peer for device info, at most once per process.
pub struct MigrationProbe {
    messenger: Arc<dyn RuntimeMessenger>,
    sequencer: BootstrapSequencer,
    func_name: String,
    fired: AtomicBool,
}

impl MigrationProbe {
    /// Create a probe that calls `func_name` on the legacy peer.
    #[must_use]
    pub fn new(
        messenger: Arc<dyn RuntimeMessenger>,
        sequencer: BootstrapSequencer,
        func_name: impl Into<String>,
    ) -> Self {
        Self {
            messenger,
            sequencer,
            func_name: func_name.into(),
            fired: AtomicBool::new(false),
        }
    }

    /// Whether the probe has run.
    #[must_use]
    pub fn has_run(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Run the probe once the host is idle, or after `max_wait`.
    pub fn schedule(
        self: Arc<Self>,
        idle: Arc<dyn IdleScheduler>,
        max_wait: Duration,
    ) -> JoinHandle<ProbeOutcome> {
        tokio::spawn(async move {
            let trigger = idle.wait_for_idle(max_wait).await;
            debug!(?trigger, "running legacy migration probe");
            self.run().await
        })
    }

    /// Run the probe now. Later calls return [`ProbeOutcome::AlreadyRan`].
    pub async fn run(&self) -> ProbeOutcome {
        if self.fired.swap(true, Ordering::SeqCst) {
            return ProbeOutcome::AlreadyRan;
        }

        match self.probe().await {
            Ok(outcome) => outcome,
            Err(ProbeError::Messaging(MessagingError::NoReceiver)) => {
                debug!("no legacy peer installed");
                ProbeOutcome::PeerAbsent
            },
            Err(e) => {
                error!(func_name = %self.func_name, error = %e, "legacy migration probe failed");
                ProbeOutcome::Failed(e)
            },
        }
    }

    async fn probe(&self) -> Result<ProbeOutcome, ProbeError> {
        let request = LegacyPeerRequest::new(self.func_name.as_str());
        let raw = self
            .messenger
            .send_message(request.to_value())
            .await
            .map_err(ProbeError::Messaging)?;

        let raw = match raw {
            None | Some(Value::Null) => {
                return Err(ProbeError::NoResult {
                    func_name: self.func_name.clone(),
                });
            },
            Some(raw) => raw,
        };

        let reply: LegacyPeerReply =
            serde_json::from_value(raw).map_err(|e| ProbeError::UnexpectedReply {
                func_name: self.func_name.clone(),
                reason: e.to_string(),
            })?;

        match reply.kind {
            PeerReplyKind::Success if reply.has_value() => {
                info!("legacy device info found, loading units for migration");
                self.sequencer
                    .ensure_ready()
                    .await
                    .map_err(ProbeError::Load)?;
                Ok(ProbeOutcome::MigrationStarted)
            },
            PeerReplyKind::Success => Ok(ProbeOutcome::NothingToMigrate),
            PeerReplyKind::Error => Err(ProbeError::Peer {
                func_name: self.func_name.clone(),
                name: reply.name.unwrap_or_else(|| "unknown".to_string()),
            }),
            PeerReplyKind::Unknown => Err(ProbeError::UnexpectedReply {
                func_name: self.func_name.clone(),
                reason: "unknown reply type".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for MigrationProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationProbe")
            .field("func_name", &self.func_name)
            .field("fired", &self.has_run())
            .finish_non_exhaustive()
    }
}
