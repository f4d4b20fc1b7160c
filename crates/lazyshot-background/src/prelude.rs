//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lazyshot_background::prelude::*;` to import all essential types.

// Startup
pub use crate::Background;

// Bootstrap
pub use crate::{
    BootstrapSequencer, EmptyUnit, ReadinessState, ReadyFuture, ReadyResult, StaticUnitLoader,
    UnitInitializer, UnitLoader,
};

// Routing
pub use crate::{ActionHandler, BackgroundExports, EventRouter, MessageHandler, RouteOutcome};

// Port and probe
pub use crate::{MigrationProbe, PortSession, ProbeOutcome, TokioIdleScheduler};

// Host seams
pub use crate::{HostServices, IdleScheduler, IdleTrigger, PortSender, RuntimeMessenger};

// Errors
pub use crate::{
    BackgroundError, BackgroundResult, DispatchError, HandlerError, HandlerResult, HostError,
    LoadError, MessagingError, ProbeError, UnitLoadFailure,
};
