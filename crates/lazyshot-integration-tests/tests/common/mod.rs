//! Shared test harness for integration tests.

use lazyshot_background::Background;
use lazyshot_config::Config;
use lazyshot_test::{MockActionHandler, MockHost, MockMessageHandler, RecordingUnitLoader};

/// Unit list used by most scenarios.
pub const UNITS: &[&str] = &["log.js", "background/communication.js", "background/main.js"];

/// A started background wired to mock collaborators.
#[allow(dead_code)]
pub struct BackgroundHarness {
    /// The running background.
    pub background: Background,
    /// The mock host (shares state with the background's services).
    pub host: MockHost,
    /// The recording unit loader.
    pub loader: RecordingUnitLoader,
    /// Action handler installed by `background/main.js`.
    pub actions: MockActionHandler,
    /// Message handler installed by `background/communication.js`.
    pub messages: MockMessageHandler,
}

#[allow(dead_code)]
impl BackgroundHarness {
    /// Start with the default harness units, migration disabled.
    pub fn start(host: MockHost) -> Self {
        let mut config = lazyshot_test::test_config(UNITS);
        config.migration.enabled = false;
        Self::start_with(host, RecordingUnitLoader::new(), &config)
    }

    /// Start with a specific loader and configuration.
    pub fn start_with(host: MockHost, loader: RecordingUnitLoader, config: &Config) -> Self {
        let actions = MockActionHandler::new();
        let messages = MockMessageHandler::new().replying(serde_json::json!({"handled": true}));
        let loader = loader
            .with_actions_on("background/main.js", actions.handler())
            .with_messages_on("background/communication.js", messages.handler());

        let background = Background::start(config, host.services(), loader.shared())
            .expect("background failed to start");

        Self {
            background,
            host,
            loader,
            actions,
            messages,
        }
    }
}

/// Yield to spawned tasks until `condition` holds, or give up.
#[allow(dead_code)]
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..1000 {
        if condition() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    condition()
}
