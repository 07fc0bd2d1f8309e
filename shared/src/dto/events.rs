//! Event-stream messages.
//!
//! Every frame on the event stream is a JSON envelope
//! `{ "type": <kind>, "payload": { ... } }`. Payload field names are camelCase.

use chrono::{DateTime, Utc};
use lib_utils::parse_utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded event-stream message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StreamEvent {
    DeploymentStatus(DeploymentStatusPayload),
    BuildLog(BuildLogPayload),
    DeploymentStart(DeploymentLifecyclePayload),
    DeploymentEnd(DeploymentLifecyclePayload),
}

impl StreamEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DeploymentStatus(_) => EventKind::DeploymentStatus,
            Self::BuildLog(_) => EventKind::BuildLog,
            Self::DeploymentStart(_) => EventKind::DeploymentStart,
            Self::DeploymentEnd(_) => EventKind::DeploymentEnd,
        }
    }

    /// Project the event is scoped to, when the payload names one.
    pub fn project_id(&self) -> Option<i64> {
        match self {
            Self::DeploymentStatus(p) => Some(p.project_id),
            Self::BuildLog(p) => Some(p.project_id),
            Self::DeploymentStart(p) | Self::DeploymentEnd(p) => p.project_id,
        }
    }

    pub fn deployment_id(&self) -> Option<i64> {
        match self {
            Self::DeploymentStatus(p) => Some(p.deployment_id),
            Self::BuildLog(p) => Some(p.deployment_id),
            Self::DeploymentStart(p) | Self::DeploymentEnd(p) => p.deployment_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DeploymentStatus,
    BuildLog,
    DeploymentStart,
    DeploymentEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatusPayload {
    pub deployment_id: i64,
    pub project_id: i64,
    /// Raw status string; see [`crate::dto::deployment::DeploymentStatus`] for known values.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogPayload {
    pub deployment_id: i64,
    pub project_id: i64,
    pub message: String,
    pub level: String,
    pub timestamp: String,
}

impl BuildLogPayload {
    /// `timestamp` as UTC, if it is valid RFC3339.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        parse_utc(&self.timestamp).ok()
    }
}

/// Start/end markers carry no fixed schema; known ids are lifted out and the
/// rest is kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentLifecyclePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_deployment_status() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"type":"deployment_status","payload":{"deploymentId":9,"projectId":2,"status":"failed","error":"npm exited 1"}}"#,
        )
        .unwrap();
        assert_eq!(event.kind(), EventKind::DeploymentStatus);
        assert_eq!(event.project_id(), Some(2));
        match event {
            StreamEvent::DeploymentStatus(p) => assert_eq!(p.error.as_deref(), Some("npm exited 1")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_decodes_build_log() {
        let event: StreamEvent = serde_json::from_value(json!({
            "type": "build_log",
            "payload": {
                "deploymentId": 9,
                "projectId": 2,
                "message": "Installing dependencies",
                "level": "info",
                "timestamp": "2024-05-01T10:00:00Z"
            }
        }))
        .unwrap();
        assert_eq!(event.deployment_id(), Some(9));
        match event {
            StreamEvent::BuildLog(p) => assert_eq!(p.timestamp_utc().unwrap().timestamp(), 1_714_557_600),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_build_log_timestamp_parsing() {
        let mut payload = BuildLogPayload {
            deployment_id: 7,
            project_id: 3,
            message: "npm install".to_string(),
            level: "info".to_string(),
            timestamp: "2024-05-01T12:00:00+02:00".to_string(),
        };
        assert_eq!(payload.timestamp_utc().unwrap().timestamp(), 1_714_557_600);

        payload.timestamp = "yesterday".to_string();
        assert_eq!(payload.timestamp_utc(), None);
    }

    #[test]
    fn test_lifecycle_keeps_unknown_fields() {
        let event: StreamEvent = serde_json::from_value(json!({
            "type": "deployment_end",
            "payload": { "deploymentId": 9, "durationSeconds": 41 }
        }))
        .unwrap();
        match event {
            StreamEvent::DeploymentEnd(p) => {
                assert_eq!(p.deployment_id, Some(9));
                assert!(p.project_id.is_none());
                assert_eq!(p.extra.get("durationSeconds"), Some(&json!(41)));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let result = serde_json::from_str::<StreamEvent>(r#"{"type":"ping","payload":{}}"#);
        assert!(result.is_err());
    }
}
