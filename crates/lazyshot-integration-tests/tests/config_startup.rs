//! Starting the background from a layered configuration file.

mod common;

use std::collections::HashMap;
use std::fs;

use common::{BackgroundHarness, eventually};
use lazyshot_config::loader::load_with_env;
use lazyshot_config::{ConfigLayer, ConfigResult, ResolvedConfig};
use lazyshot_telemetry::{LogConfig, LogFormat};
use lazyshot_test::{MockHost, RecordingUnitLoader, click_message, test_tab};

fn load(toml: &str) -> ConfigResult<ResolvedConfig> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lazyshot.toml");
    fs::write(&path, toml).unwrap();
    let empty_dir = tempfile::tempdir().unwrap();
    load_with_env(Some(&path), Some(empty_dir.path()), &HashMap::new())
}

#[tokio::test]
async fn explicit_file_drives_startup() {
    let resolved = load(
        r#"
        [units]
        order = ["log.js", "background/communication.js", "background/main.js"]

        [port]
        name = "testPort"

        [migration]
        enabled = false

        [logging]
        level = "debug"
        format = "json"
        "#,
    )
    .unwrap();

    assert_eq!(resolved.source_of("port.name"), Some(ConfigLayer::Explicit));
    assert_eq!(resolved.source_of("units.order"), Some(ConfigLayer::Explicit));
    assert_eq!(
        resolved.source_of("context_menu.id"),
        Some(ConfigLayer::Defaults)
    );

    let logging = LogConfig::from_section(&resolved.config.logging).unwrap();
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.format, LogFormat::Json);

    let harness = BackgroundHarness::start_with(
        MockHost::new().with_tab(test_tab(9)),
        RecordingUnitLoader::new(),
        &resolved.config,
    );
    assert_eq!(harness.background.port().name(), "testPort");
    assert!(harness.background.exports().port().is_some());

    harness.host.send_port_message(click_message(9));
    assert!(eventually(|| harness.actions.clicks().len() == 1).await);
    assert_eq!(harness.loader.load_count(), 3);
}

#[test]
fn invalid_idle_timeout_is_rejected() {
    let result = load(
        r"
        [migration]
        idle_timeout_ms = 0
        ",
    );
    assert!(result.is_err());
}
