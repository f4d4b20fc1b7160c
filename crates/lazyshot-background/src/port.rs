//! The long-lived page-action port.

use std::sync::Arc;

use lazyshot_core::OutboundPortMessage;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::host::{PortConnector, PortEndpoints, PortSender};
use crate::modules::BackgroundExports;
use crate::router::EventRouter;

/// An open page-action port and the task pumping its inbound messages.
pub struct PortSession {
    sender: Arc<dyn PortSender>,
    pump: JoinHandle<()>,
}

impl PortSession {
    /// Open the named port, publish it on `exports`, push the page-action
    /// title, then start routing inbound messages.
    ///
    /// The `setProperties` push is posted before the inbound pump starts,
    /// so it always precedes the handling of the first inbound message.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot open the port. A failed title
    /// push is only logged.
    pub fn open(
        connector: &dyn PortConnector,
        name: &str,
        title: &str,
        router: Arc<EventRouter>,
        exports: &BackgroundExports,
    ) -> Result<Self, HostError> {
        let PortEndpoints {
            sender,
            mut inbound,
        } = connector.connect(name)?;
        info!(port = name, "page-action port opened");

        if !exports.attach_port(Arc::clone(&sender)) {
            warn!(port = name, "a port was already published, keeping the first");
        }

        let properties = OutboundPortMessage::SetProperties {
            title: title.to_string(),
        };
        if let Err(e) = sender.post_message(properties.to_value()) {
            warn!(port = name, error = %e, "failed to push page-action properties");
        }

        let port_name = name.to_string();
        let pump = tokio::spawn(async move {
            while let Some(raw) = inbound.recv().await {
                router.on_port_message(raw);
            }
            debug!(port = %port_name, "page-action port disconnected");
        });

        Ok(Self { sender, pump })
    }

    /// The outbound half of the port.
    #[must_use]
    pub fn port(&self) -> &Arc<dyn PortSender> {
        &self.sender
    }

    /// Port name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.sender.name()
    }

    /// Whether the peer has disconnected and the pump has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pump.is_finished()
    }
}

impl std::fmt::Debug for PortSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortSession")
            .field("name", &self.name())
            .field("closed", &self.is_closed())
            .finish()
    }
}
