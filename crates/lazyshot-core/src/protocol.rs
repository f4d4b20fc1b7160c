//! Wire protocol for the page-action port and the legacy peer context.
//!
//! Port messages are JSON objects discriminated by a string `type` field.
//! Inbound messages are decoded by hand so that an unknown `type` can be
//! reported as unrecognized rather than as a generic decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::tab::TabId;

/// Message received on the page-action port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMessage {
    /// The page action was clicked in a tab.
    Click {
        /// Tab the action was clicked in.
        tab_id: TabId,
    },
}

#[derive(Deserialize)]
struct ClickBody {
    tab: TabRef,
}

#[derive(Deserialize)]
struct TabRef {
    id: TabId,
}

impl PortMessage {
    /// Decode a raw port message.
    ///
    /// # Errors
    ///
    /// - [`CoreError::MissingMessageType`] if `type` is absent or not a string.
    /// - [`CoreError::UnrecognizedMessage`] for any `type` other than `click`.
    /// - [`CoreError::MalformedMessage`] if a `click` lacks `tab.id`.
    pub fn parse(raw: &Value) -> CoreResult<Self> {
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CoreError::MissingMessageType)?;

        match kind {
            "click" => {
                let body: ClickBody =
                    serde_json::from_value(raw.clone()).map_err(|e| CoreError::MalformedMessage {
                        kind: kind.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Self::Click {
                    tab_id: body.tab.id,
                })
            },
            other => Err(CoreError::UnrecognizedMessage(other.to_string())),
        }
    }
}

/// Message sent on the page-action port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundPortMessage {
    /// Declarative push of the page action's display properties.
    SetProperties {
        /// Localized action title.
        title: String,
    },
}

impl OutboundPortMessage {
    /// Encode as a JSON value for the port.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Request sent to the legacy peer context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPeerRequest {
    /// Remote function to invoke.
    pub func_name: String,
}

impl LegacyPeerRequest {
    /// Request the legacy device info.
    #[must_use]
    pub fn new(func_name: impl Into<String>) -> Self {
        Self {
            func_name: func_name.into(),
        }
    }

    /// Encode as a JSON value for the messaging channel.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Outcome kind reported by the legacy peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerReplyKind {
    /// The call succeeded.
    Success,
    /// The call failed; `name` carries the error name.
    Error,
    /// Any other kind.
    #[serde(other)]
    Unknown,
}

/// Reply from the legacy peer context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyPeerReply {
    /// Outcome kind.
    #[serde(rename = "type")]
    pub kind: PeerReplyKind,
    /// Returned value on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Error name on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LegacyPeerReply {
    /// Whether the reply reports success with a truthy value.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.kind == PeerReplyKind::Success && self.value.as_ref().is_some_and(is_truthy)
    }
}

/// Whether a JSON value counts as present in the sender's context.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy. Arrays and objects are
/// truthy even when empty.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_click() {
        let msg = PortMessage::parse(&json!({
            "type": "click",
            "tab": {"id": 42, "url": "https://example.com"}
        }))
        .unwrap();
        assert_eq!(
            msg,
            PortMessage::Click {
                tab_id: TabId::new(42)
            }
        );
    }

    #[test]
    fn parse_unknown_type() {
        let err = PortMessage::parse(&json!({"type": "bogus"})).unwrap_err();
        assert_eq!(err, CoreError::UnrecognizedMessage("bogus".into()));
    }

    #[test]
    fn parse_missing_type() {
        assert_eq!(
            PortMessage::parse(&json!({"tab": {"id": 1}})).unwrap_err(),
            CoreError::MissingMessageType
        );
        assert_eq!(
            PortMessage::parse(&json!({"type": 3})).unwrap_err(),
            CoreError::MissingMessageType
        );
    }

    #[test]
    fn parse_click_without_tab_is_malformed() {
        let err = PortMessage::parse(&json!({"type": "click"})).unwrap_err();
        assert!(matches!(err, CoreError::MalformedMessage { ref kind, .. } if kind == "click"));
    }

    #[test]
    fn set_properties_wire_shape() {
        let msg = OutboundPortMessage::SetProperties {
            title: "Take a Screenshot".into(),
        };
        let expected = json!({"type": "setProperties", "title": "Take a Screenshot"});
        assert_eq!(msg.to_value(), expected);
        assert_eq!(serde_json::to_value(&msg).unwrap(), expected);
    }

    #[test]
    fn legacy_request_wire_shape() {
        let req = LegacyPeerRequest::new("getOldDeviceInfo");
        let expected = json!({"funcName": "getOldDeviceInfo"});
        assert_eq!(req.to_value(), expected);
        assert_eq!(serde_json::to_value(&req).unwrap(), expected);
    }

    #[test]
    fn legacy_reply_value_detection() {
        let with_value: LegacyPeerReply =
            serde_json::from_value(json!({"type": "success", "value": {"deviceId": "abc"}}))
                .unwrap();
        assert!(with_value.has_value());

        let null_value: LegacyPeerReply =
            serde_json::from_value(json!({"type": "success", "value": null})).unwrap();
        assert!(!null_value.has_value());

        let error: LegacyPeerReply =
            serde_json::from_value(json!({"type": "error", "name": "NotFound"})).unwrap();
        assert_eq!(error.kind, PeerReplyKind::Error);
        assert!(!error.has_value());

        let odd: LegacyPeerReply = serde_json::from_value(json!({"type": "pending"})).unwrap();
        assert_eq!(odd.kind, PeerReplyKind::Unknown);
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn empty_containers_count_as_device_info() {
        let reply: LegacyPeerReply =
            serde_json::from_value(json!({"type": "success", "value": {}})).unwrap();
        assert!(reply.has_value());
        let reply: LegacyPeerReply =
            serde_json::from_value(json!({"type": "success", "value": []})).unwrap();
        assert!(reply.has_value());
        let reply: LegacyPeerReply =
            serde_json::from_value(json!({"type": "success", "value": null})).unwrap();
        assert!(!reply.has_value());
    }
}
