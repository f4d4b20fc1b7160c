//! End-to-end startup and routing through `Background::start`.

mod common;

use common::{BackgroundHarness, UNITS, eventually};
use lazyshot_background::{Background, BackgroundError, HostError, ReadinessState};
use lazyshot_core::{ContextMenuItem, InboundEvent, MessageSender, ReplyHandle};
use lazyshot_test::{
    MockHost, RecordingUnitLoader, click_message, test_config, test_menu_info, test_tab,
};
use serde_json::json;

#[tokio::test]
async fn startup_registers_sources_without_loading() {
    let host = MockHost::new().with_translation("contextMenuLabel", "Take a Screenshot");
    let harness = BackgroundHarness::start(host);

    assert_eq!(
        harness.host.menus(),
        vec![ContextMenuItem {
            id: "create-screenshot".into(),
            title: "Take a Screenshot".into(),
            contexts: vec!["page".into()],
            document_url_patterns: vec!["<all_urls>".into()],
        }]
    );
    assert_eq!(
        harness.host.posted_port_messages(),
        vec![json!({"type": "setProperties", "title": "Take a Screenshot"})]
    );
    assert_eq!(harness.background.title(), "Take a Screenshot");
    assert_eq!(harness.loader.load_count(), 0);
    assert_eq!(
        harness.background.sequencer().state(),
        ReadinessState::NotStarted
    );

    let port = harness.background.exports().port().unwrap();
    assert_eq!(port.name(), "photonPageActionPort");
    assert_eq!(harness.background.port().name(), "photonPageActionPort");
    assert!(harness.background.is_dispatching());
}

#[tokio::test]
async fn missing_translation_falls_back_to_key() {
    let harness = BackgroundHarness::start(MockHost::new());
    assert_eq!(harness.background.title(), "contextMenuLabel");
    assert_eq!(harness.host.menus()[0].title, "contextMenuLabel");
}

#[tokio::test]
async fn port_click_loads_units_then_dispatches() {
    let harness = BackgroundHarness::start(MockHost::new().with_tab(test_tab(5)));

    assert!(harness.host.send_port_message(click_message(5)));
    assert!(eventually(|| harness.actions.clicks().len() == 1).await);

    assert_eq!(harness.loader.started(), UNITS);
    assert_eq!(harness.actions.clicks(), vec![test_tab(5)]);
    assert_eq!(
        harness.background.sequencer().state(),
        ReadinessState::Complete
    );
}

#[tokio::test]
async fn events_from_every_source_share_one_load() {
    let harness = BackgroundHarness::start(MockHost::new().with_tab(test_tab(1)));
    let events = harness.background.event_sender();

    harness.host.send_port_message(click_message(1));
    events
        .send(InboundEvent::context_menu_click(test_menu_info(), test_tab(1)))
        .unwrap();
    let (reply, response) = ReplyHandle::channel();
    events
        .send(InboundEvent::message(
            json!({"funcName": "getStrings"}),
            MessageSender::default(),
            reply,
        ))
        .unwrap();

    assert_eq!(response.await.unwrap(), json!({"handled": true}));
    assert!(
        eventually(|| {
            harness.actions.clicks().len() == 1 && harness.actions.menu_clicks().len() == 1
        })
        .await
    );
    assert_eq!(harness.loader.load_count(), UNITS.len());
    assert_eq!(
        harness.actions.menu_clicks(),
        vec![(test_menu_info(), test_tab(1))]
    );
}

#[tokio::test]
async fn message_listener_reports_async_response() {
    let harness = BackgroundHarness::start(MockHost::new());
    let (reply, response) = ReplyHandle::channel();

    let pending = harness.background.router().on_message(
        json!({"funcName": "getStrings"}),
        MessageSender::default(),
        reply,
    );

    assert!(pending);
    assert_eq!(response.await.unwrap(), json!({"handled": true}));
    assert_eq!(
        harness.messages.requests(),
        vec![json!({"funcName": "getStrings"})]
    );
}

#[tokio::test]
async fn failed_bootstrap_keeps_sources_alive() {
    let mut config = test_config(UNITS);
    config.migration.enabled = false;
    let host = MockHost::new().with_tab(test_tab(1));
    let harness = BackgroundHarness::start_with(
        host,
        RecordingUnitLoader::new().fail_on("background/communication.js", "X"),
        &config,
    );

    let first = harness.background.router().on_port_message(click_message(1));
    let second = harness
        .background
        .router()
        .on_context_menu_clicked(test_menu_info(), test_tab(1));

    assert!(!first.await.unwrap().is_dispatched());
    assert!(!second.await.unwrap().is_dispatched());
    assert_eq!(harness.loader.load_count(), 2);
    assert!(harness.actions.clicks().is_empty());
    assert!(harness.background.is_dispatching());

    let err = harness.background.ensure_ready().await.unwrap_err();
    assert_eq!(err.unit.as_str(), "background/communication.js");
}

#[tokio::test]
async fn port_disconnect_stops_the_pump() {
    let harness = BackgroundHarness::start(MockHost::new());
    assert!(!harness.background.port().is_closed());

    harness.host.disconnect_port();

    assert!(eventually(|| harness.background.port().is_closed()).await);
}

#[tokio::test]
async fn rejected_menu_fails_startup() {
    let host = MockHost::new().with_menu_error(HostError::Platform("no menus".into()));
    let result = Background::start(
        &test_config(UNITS),
        host.services(),
        RecordingUnitLoader::new().shared(),
    );
    assert!(matches!(
        result,
        Err(BackgroundError::Host(HostError::Platform(_)))
    ));
    assert!(host.ports().is_empty());
}

#[tokio::test]
async fn refused_port_fails_startup() {
    let host = MockHost::new().refusing_ports();
    let result = Background::start(
        &test_config(UNITS),
        host.services(),
        RecordingUnitLoader::new().shared(),
    );
    assert!(matches!(result, Err(BackgroundError::Host(_))));
}

#[tokio::test]
async fn invalid_unit_name_fails_startup() {
    let host = MockHost::new();
    let result = Background::start(
        &test_config(&["log.js", "  "]),
        host.services(),
        RecordingUnitLoader::new().shared(),
    );
    assert!(matches!(result, Err(BackgroundError::InvalidUnit(_))));
    assert!(host.menus().is_empty());
}
