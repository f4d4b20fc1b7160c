//! Routes inbound host events through the bootstrap gate to the
//! downstream handlers.
//!
//! Every entry point follows the same shape: wait for
//! [`BootstrapSequencer::ensure_ready`], forward the untouched event, and
//! log any failure instead of returning it to the host.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use lazyshot_core::{ContextMenuInfo, InboundEvent, MessageSender, PortMessage, ReplyHandle, Tab};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::error::{DispatchError, panic_message};
use crate::host::TabLookup;
use crate::modules::{ActionHandler, BackgroundExports, MessageHandler};
use crate::sequencer::BootstrapSequencer;

/// What happened to one inbound event.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// The event reached its downstream handler.
    Dispatched,
    /// The event was not understood and was dropped without loading.
    Ignored,
    /// Loading or dispatch failed. Already logged.
    Failed(DispatchError),
}

impl RouteOutcome {
    /// Whether the event reached its handler.
    #[must_use]
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

/// Gates inbound events behind the bootstrap and dispatches them.
pub struct EventRouter {
    sequencer: BootstrapSequencer,
    tabs: Arc<dyn TabLookup>,
}

impl EventRouter {
    /// Create a router.
    #[must_use]
    pub fn new(sequencer: BootstrapSequencer, tabs: Arc<dyn TabLookup>) -> Self {
        Self { sequencer, tabs }
    }

    /// The sequencer this router waits on.
    #[must_use]
    pub fn sequencer(&self) -> &BootstrapSequencer {
        &self.sequencer
    }

    fn exports(&self) -> &Arc<BackgroundExports> {
        self.sequencer.exports()
    }

    /// Route any inbound event.
    pub async fn route(&self, event: InboundEvent) -> RouteOutcome {
        trace!(
            event_type = event.event_type(),
            event_id = %event.metadata().event_id,
            "routing event"
        );
        match event {
            InboundEvent::ContextMenuClick { info, tab, .. } => {
                self.handle_context_menu_click(info, tab).await
            },
            InboundEvent::Message {
                request,
                sender,
                reply,
                ..
            } => self.handle_message(request, sender, reply).await,
            InboundEvent::PortMessage { message, .. } => self.handle_port_message(message).await,
        }
    }

    /// A context-menu item was clicked.
    pub async fn handle_context_menu_click(&self, info: ContextMenuInfo, tab: Tab) -> RouteOutcome {
        let result = guarded(async {
            let actions = self.ready_actions().await?;
            actions
                .on_clicked_context_menu(info, tab)
                .await
                .map_err(DispatchError::Handler)
        })
        .await;
        finish("context_menu_click", result)
    }

    /// A cross-context message arrived.
    pub async fn handle_message(
        &self,
        request: Value,
        sender: MessageSender,
        reply: ReplyHandle,
    ) -> RouteOutcome {
        let result = guarded(async {
            self.sequencer
                .ensure_ready()
                .await
                .map_err(DispatchError::Load)?;
            let messages: Arc<dyn MessageHandler> = self
                .exports()
                .messages()
                .ok_or(DispatchError::NotInstalled("message"))?;
            let handled = messages
                .on_message(request, sender, reply)
                .await
                .map_err(DispatchError::Handler)?;
            if !handled {
                debug!("message handler declined the message");
            }
            Ok(())
        })
        .await;
        finish("message", result)
    }

    /// A message arrived on the page-action port.
    ///
    /// Messages of an unknown type are logged and dropped before the
    /// bootstrap is consulted, so they never trigger loading.
    pub async fn handle_port_message(&self, raw: Value) -> RouteOutcome {
        let message = match PortMessage::parse(&raw) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, raw = %raw, "unrecognized port message");
                return RouteOutcome::Ignored;
            },
        };

        let result = guarded(async {
            match message {
                PortMessage::Click { tab_id } => {
                    let actions = self.ready_actions().await?;
                    let tab = self
                        .tabs
                        .get(tab_id)
                        .await
                        .map_err(DispatchError::TabLookup)?;
                    actions.on_clicked(tab).await.map_err(DispatchError::Handler)
                },
            }
        })
        .await;
        finish("port_message", result)
    }

    async fn ready_actions(&self) -> Result<Arc<dyn ActionHandler>, DispatchError> {
        self.sequencer
            .ensure_ready()
            .await
            .map_err(DispatchError::Load)?;
        self.exports()
            .actions()
            .ok_or(DispatchError::NotInstalled("action"))
    }

    /// Host listener for context-menu clicks. Routing runs on its own task.
    pub fn on_context_menu_clicked(
        self: &Arc<Self>,
        info: ContextMenuInfo,
        tab: Tab,
    ) -> JoinHandle<RouteOutcome> {
        let router = Arc::clone(self);
        tokio::spawn(async move { router.handle_context_menu_click(info, tab).await })
    }

    /// Host listener for runtime messages.
    ///
    /// Always returns `true` straight away: the reply is sent
    /// asynchronously once the units have loaded.
    pub fn on_message(
        self: &Arc<Self>,
        request: Value,
        sender: MessageSender,
        reply: ReplyHandle,
    ) -> bool {
        let router = Arc::clone(self);
        tokio::spawn(async move { router.handle_message(request, sender, reply).await });
        true
    }

    /// Host listener for page-action port messages.
    pub fn on_port_message(self: &Arc<Self>, raw: Value) -> JoinHandle<RouteOutcome> {
        let router = Arc::clone(self);
        tokio::spawn(async move { router.handle_port_message(raw).await })
    }

    /// Pump events from a host adapter until the channel closes. Each event
    /// is routed on its own task.
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<InboundEvent>) {
        while let Some(event) = events.recv().await {
            let router = Arc::clone(&self);
            tokio::spawn(async move {
                router.route(event).await;
            });
        }
        debug!("event channel closed, router stopping");
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}

async fn guarded<F>(dispatch: F) -> Result<(), DispatchError>
where
    F: Future<Output = Result<(), DispatchError>>,
{
    AssertUnwindSafe(dispatch)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(DispatchError::Panicked(panic_message(payload.as_ref()))))
}

fn finish(event: &'static str, result: Result<(), DispatchError>) -> RouteOutcome {
    match result {
        Ok(()) => {
            trace!(event, "event dispatched");
            RouteOutcome::Dispatched
        },
        Err(e) => {
            error!(event, error = %e, "failed to dispatch event");
            RouteOutcome::Failed(e)
        },
    }
}
