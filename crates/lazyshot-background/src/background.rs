//! Startup wiring of the background process.

use std::sync::Arc;

use lazyshot_config::Config;
use lazyshot_core::{ContextMenuItem, InboundEvent, UnitName};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::BackgroundResult;
use crate::host::{HostServices, localize};
use crate::loader::UnitLoader;
use crate::modules::BackgroundExports;
use crate::port::PortSession;
use crate::probe::{MigrationProbe, ProbeOutcome};
use crate::router::EventRouter;
use crate::sequencer::{BootstrapSequencer, ReadyFuture};

/// The running background process.
///
/// Everything here is registered eagerly and lives until the host tears
/// the process down. The units themselves load lazily on the first event.
pub struct Background {
    exports: Arc<BackgroundExports>,
    sequencer: BootstrapSequencer,
    router: Arc<EventRouter>,
    events: mpsc::UnboundedSender<InboundEvent>,
    dispatch: JoinHandle<()>,
    port: PortSession,
    probe: Option<JoinHandle<ProbeOutcome>>,
    title: String,
}

impl Background {
    /// Register the always-on event sources and arm the deferred bootstrap.
    ///
    /// In order: the context-menu item, the event dispatch loop, the
    /// page-action port, and (when enabled) the idle-time migration probe.
    /// No unit is loaded here.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured unit name is invalid, or if the host
    /// rejects the menu item or cannot open the port.
    pub fn start(
        config: &Config,
        host: HostServices,
        loader: Arc<dyn UnitLoader>,
    ) -> BackgroundResult<Self> {
        let exports = Arc::new(BackgroundExports::new());
        let units = config
            .units
            .order
            .iter()
            .map(|name| UnitName::new(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let menu = &config.context_menu;
        let title = localize(host.i18n.as_ref(), &menu.title_message);
        host.menus.create(ContextMenuItem {
            id: menu.id.clone(),
            title: title.clone(),
            contexts: menu.contexts.clone(),
            document_url_patterns: menu.document_url_patterns.clone(),
        })?;
        debug!(id = %menu.id, "context menu item registered");

        let sequencer = BootstrapSequencer::new(units, loader, Arc::clone(&exports));
        let router = Arc::new(EventRouter::new(sequencer.clone(), Arc::clone(&host.tabs)));

        let (events, inbound) = mpsc::unbounded_channel();
        let dispatch = tokio::spawn(Arc::clone(&router).run(inbound));

        let port = PortSession::open(
            host.ports.as_ref(),
            &config.port.name,
            &title,
            Arc::clone(&router),
            &exports,
        )?;

        let probe = if config.migration.enabled {
            let probe = Arc::new(MigrationProbe::new(
                Arc::clone(&host.messenger),
                sequencer.clone(),
                config.migration.func_name.as_str(),
            ));
            Some(probe.schedule(Arc::clone(&host.idle), config.migration.idle_timeout()))
        } else {
            debug!("legacy migration probe disabled");
            None
        };

        info!(
            units = sequencer.units().len(),
            port = %config.port.name,
            "background started"
        );

        Ok(Self {
            exports,
            sequencer,
            router,
            events,
            dispatch,
            port,
            probe,
            title,
        })
    }

    /// Channel for a host adapter to feed inbound events into the router.
    #[must_use]
    pub fn event_sender(&self) -> mpsc::UnboundedSender<InboundEvent> {
        self.events.clone()
    }

    /// The event router.
    #[must_use]
    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    /// The bootstrap sequencer.
    #[must_use]
    pub fn sequencer(&self) -> &BootstrapSequencer {
        &self.sequencer
    }

    /// Exports shared with the units.
    #[must_use]
    pub fn exports(&self) -> &Arc<BackgroundExports> {
        &self.exports
    }

    /// The page-action port session.
    #[must_use]
    pub fn port(&self) -> &PortSession {
        &self.port
    }

    /// Localized menu and page-action title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Shortcut for [`BootstrapSequencer::ensure_ready`].
    pub fn ensure_ready(&self) -> ReadyFuture {
        self.sequencer.ensure_ready()
    }

    /// Take the handle of the scheduled migration probe, if any.
    pub fn take_probe(&mut self) -> Option<JoinHandle<ProbeOutcome>> {
        self.probe.take()
    }

    /// Whether the event dispatch loop is still running.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        !self.dispatch.is_finished()
    }
}

impl std::fmt::Debug for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Background")
            .field("title", &self.title)
            .field("sequencer", &self.sequencer)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
