use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Building,
    Deploying,
    Success,
    Failed,
    Cancelled,
}

impl DeploymentStatus {
    /// No further status transitions follow a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Building => "building",
            Self::Deploying => "deploying",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    Manual,
    Webhook,
    Api,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    pub id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub commit_hash: String,
    #[serde(default)]
    pub commit_message: String,
    #[serde(default)]
    pub commit_author: String,
    #[serde(default)]
    pub branch: String,
    pub status: DeploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub triggered_by: TriggerSource,
    #[serde(default)]
    pub triggered_by_id: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_logs: Option<Vec<BuildLog>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentList {
    pub deployments: Vec<Deployment>,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Info,
    Error,
    Warning,
}

/// Persisted build log line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildLog {
    pub id: i64,
    pub deployment_id: i64,
    pub log: String,
    pub log_type: LogType,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildLogList {
    pub logs: Vec<BuildLog>,
    #[serde(default)]
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(DeploymentStatus::Success.is_terminal());
        assert!(DeploymentStatus::Cancelled.is_terminal());
        assert!(!DeploymentStatus::Building.is_terminal());
    }

    #[test]
    fn test_status_string_matches_wire() {
        for status in [
            DeploymentStatus::Pending,
            DeploymentStatus::Deploying,
            DeploymentStatus::Failed,
        ] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(status.as_str().to_string())
            );
        }
    }
}
